//! Gantry Core
//!
//! Timeline reconstruction for multi-stage build pipelines.
//!
//! This crate contains:
//! - Domain types: pipeline structure, reference dates, task intervals
//! - The `DurationResolver` seam and its retry/cache decorators
//! - `TimelineBuilder`, which lays stages, chains and work items out on a shared time axis
//! - The chart model consumed by renderers

pub mod chart;
pub mod domain;
pub mod error;
pub mod label;
pub mod resolver;
pub mod timeline;

pub use error::{LookupError, RenderError, SpecError, TimelineError};

#[cfg(test)]
mod test_support;
