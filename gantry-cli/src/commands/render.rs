//! Render command handler

use anyhow::{Context, Result};
use colored::*;
use gantry_core::chart::{GanttChart, default_file_stem};
use std::path::PathBuf;

use super::{PipelineArgs, build_resolver, load_pipeline, run_timelines};
use crate::config::Config;
use crate::render::Format;

/// Build timelines for every date and write the rendered chart
///
/// Dates that failed are reported and left out of the chart; the command
/// still exits with an error afterwards.
pub async fn handle_render(
    args: &PipelineArgs,
    format: Format,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let spec = load_pipeline(&args.pipeline)?;
    let resolver = build_resolver(config)?;

    let run = run_timelines(resolver, &spec, &args.dates).await;
    let chart = GanttChart::from_timelines(&run.timelines);

    if chart.is_empty() {
        return run.finish().map(|_| ());
    }

    let renderer = format.renderer();
    let document = renderer.render(&chart).context("Failed to render chart")?;
    let output = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "{}.{}",
            default_file_stem(&chart.dates),
            renderer.extension()
        ))
    });

    std::fs::write(&output, document)
        .with_context(|| format!("Failed to write chart: {}", output.display()))?;

    println!("{}", "✓ Chart rendered successfully!".green().bold());
    println!("  Title:     {}", chart.title.bold());
    println!("  Intervals: {}", chart.intervals.len().to_string().dimmed());
    println!("  Output:    {}", output.display().to_string().cyan());

    run.finish().map(|_| ())
}
