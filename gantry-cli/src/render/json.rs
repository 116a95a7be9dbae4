//! JSON renderer

use gantry_core::RenderError;
use gantry_core::chart::{ChartRenderer, GanttChart};

/// Pretty-printed JSON of the chart title, dates and intervals
pub struct JsonRenderer;

impl ChartRenderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, chart: &GanttChart) -> Result<String, RenderError> {
        if chart.is_empty() {
            return Err(RenderError::Empty);
        }
        Ok(serde_json::to_string_pretty(chart)?)
    }
}
