//! Chart renderers

mod html;
mod json;

pub use html::HtmlRenderer;
pub use json::JsonRenderer;

use clap::ValueEnum;
use gantry_core::chart::ChartRenderer;

/// Output format of the render command
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Self-contained HTML page with an SVG chart
    Html,
    /// Intervals as JSON
    Json,
}

impl Format {
    pub fn renderer(self) -> Box<dyn ChartRenderer> {
        match self {
            Format::Html => Box::new(HtmlRenderer::default()),
            Format::Json => Box::new(JsonRenderer),
        }
    }
}
