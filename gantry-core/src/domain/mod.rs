//! Core domain types
//!
//! This module contains the structures shared by the timeline builder, the
//! resolvers and the renderers. Pipeline specifications are read-only input;
//! task intervals are produced once by the builder and never mutated.

pub mod date;
pub mod interval;
pub mod pipeline;

pub use date::{ANCHOR, ReferenceDate};
pub use interval::{TaskInterval, Timeline};
pub use pipeline::{Chain, PipelineSpec, Stage, WorkItemId};
