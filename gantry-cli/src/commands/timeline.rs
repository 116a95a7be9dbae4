//! Timeline command handler
//!
//! Prints every computed interval, grouped by reference date.

use anyhow::Result;
use chrono::NaiveDateTime;
use colored::*;
use gantry_core::domain::{ANCHOR, TaskInterval, Timeline};

use super::{PipelineArgs, build_resolver, load_pipeline, run_timelines};
use crate::config::Config;

pub async fn handle_timeline(args: &PipelineArgs, config: &Config) -> Result<()> {
    let spec = load_pipeline(&args.pipeline)?;
    let resolver = build_resolver(config)?;

    let run = run_timelines(resolver, &spec, &args.dates).await;
    for timeline in &run.timelines {
        print_timeline(timeline);
    }

    run.finish().map(|_| ())
}

fn print_timeline(timeline: &Timeline) {
    println!(
        "{}",
        format!(
            "Timeline as of {} (total {} mins):",
            timeline.reference_date,
            timeline.total_minutes(ANCHOR)
        )
        .bold()
    );

    for interval in &timeline.intervals {
        print_interval(interval);
    }

    if timeline.is_degraded() {
        println!(
            "  {}",
            format!(
                "{} work item(s) had no successful build and use a duration of 0",
                timeline.degraded.len()
            )
            .yellow()
        );
    }
    println!();
}

fn print_interval(interval: &TaskInterval) {
    let duration = format!("{} mins", interval.duration_minutes);
    let duration = if interval.degraded {
        duration.yellow()
    } else {
        duration.green()
    };

    println!(
        "  {} {:<50} {} → {}  {}",
        "▸".cyan(),
        interval.label,
        offset(interval.start).dimmed(),
        offset(interval.finish).dimmed(),
        duration
    );
}

/// Time since the anchor as `+H:MM`
pub fn offset(at: NaiveDateTime) -> String {
    let minutes = (at - ANCHOR).num_minutes();
    format!("+{}:{:02}", minutes / 60, minutes % 60)
}
