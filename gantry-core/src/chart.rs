//! Chart model handed to renderers
//!
//! A chart is the concatenation of every reference date's intervals. Rows are
//! grouped by `group_key` so the same job on different dates sits together.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{ReferenceDate, TaskInterval, Timeline};
use crate::error::RenderError;

/// Intervals of all requested reference dates, ready to render
#[derive(Debug, Clone, Serialize)]
pub struct GanttChart {
    pub title: String,
    pub dates: Vec<ReferenceDate>,
    pub intervals: Vec<TaskInterval>,
}

/// One chart row: a label and the intervals drawn on it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartRow<'a> {
    pub label: &'a str,
    pub group_key: &'a str,
    pub intervals: Vec<&'a TaskInterval>,
}

/// Turns a chart into an output document
pub trait ChartRenderer {
    /// File extension of the produced document, without the dot
    fn extension(&self) -> &'static str;

    fn render(&self, chart: &GanttChart) -> Result<String, RenderError>;
}

impl GanttChart {
    /// Concatenate timelines in the given order
    pub fn from_timelines(timelines: &[Timeline]) -> Self {
        let dates: Vec<ReferenceDate> = timelines.iter().map(|t| t.reference_date).collect();
        Self {
            title: chart_title(&dates),
            intervals: timelines
                .iter()
                .flat_map(|t| t.intervals.iter().cloned())
                .collect(),
            dates,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Rows grouped by `group_key` in first-appearance order, one row per
    /// distinct label inside a group
    pub fn rows(&self) -> Vec<ChartRow<'_>> {
        let mut groups: Vec<&str> = Vec::new();
        for interval in &self.intervals {
            if !groups.contains(&interval.group_key.as_str()) {
                groups.push(&interval.group_key);
            }
        }

        let mut rows: Vec<ChartRow<'_>> = Vec::new();
        for group in groups {
            for interval in self.intervals.iter().filter(|i| i.group_key == group) {
                match rows
                    .iter_mut()
                    .find(|r| r.group_key == group && r.label == interval.label)
                {
                    Some(row) => row.intervals.push(interval),
                    None => rows.push(ChartRow {
                        label: &interval.label,
                        group_key: &interval.group_key,
                        intervals: vec![interval],
                    }),
                }
            }
        }
        rows
    }

    /// Earliest start and latest finish across all intervals
    pub fn span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let start = self.intervals.iter().map(|i| i.start).min()?;
        let finish = self.intervals.iter().map(|i| i.finish).max()?;
        Some((start, finish))
    }

    /// Distinct group keys in first-appearance order
    pub fn group_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for interval in &self.intervals {
            if !keys.contains(&interval.group_key.as_str()) {
                keys.push(&interval.group_key);
            }
        }
        keys
    }
}

/// "Build pipeline timings on A and B"
pub fn chart_title(dates: &[ReferenceDate]) -> String {
    let rendered: Vec<String> = dates.iter().map(ToString::to_string).collect();
    let joined = match rendered.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    };
    format!("Build pipeline timings on {}", joined)
}

/// Default output file name, without extension
pub fn default_file_stem(dates: &[ReferenceDate]) -> String {
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => format!("gantt-simple-gantt-chart-{}-to-{}", first, last),
        _ => "gantt-simple-gantt-chart".to_string(),
    }
}
