//! HTML renderer
//!
//! Produces a self-contained page with an inline SVG Gantt chart. Rows are
//! grouped by job so the same job on different reference dates sits
//! together; bars are colored per job and show the duration on hover.

use chrono::NaiveDateTime;
use gantry_core::RenderError;
use gantry_core::chart::{ChartRenderer, GanttChart};
use std::fmt::Write;

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Tick spacings in minutes, smallest first
const TICK_STEPS: [i64; 12] = [1, 2, 5, 10, 15, 30, 60, 120, 240, 480, 720, 1440];
const MAX_TICKS: i64 = 10;

/// SVG Gantt chart layout
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    pub width: u32,
    /// Room for row labels
    pub left_margin: u32,
    pub right_margin: u32,
    pub row_height: u32,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self {
            width: 1200,
            left_margin: 310,
            right_margin: 10,
            row_height: 28,
        }
    }
}

impl ChartRenderer for HtmlRenderer {
    fn extension(&self) -> &'static str {
        "html"
    }

    fn render(&self, chart: &GanttChart) -> Result<String, RenderError> {
        if chart.is_empty() {
            return Err(RenderError::Empty);
        }
        self.write_page(chart)
            .map_err(|e| RenderError::Other(e.to_string()))
    }
}

impl HtmlRenderer {
    fn write_page(&self, chart: &GanttChart) -> Result<String, std::fmt::Error> {
        let (start, finish) = chart.span().unwrap_or_default();
        let total = (finish - start).num_minutes().max(1);
        let rows = chart.rows();
        let groups = chart.group_keys();

        let top = 10u32;
        let axis = 40u32;
        let height = top + rows.len() as u32 * self.row_height + axis;
        let plot_width = f64::from(
            self.width
                .saturating_sub(self.left_margin)
                .saturating_sub(self.right_margin),
        );
        let left = f64::from(self.left_margin);
        let x = |at: NaiveDateTime| left + (at - start).num_minutes() as f64 / total as f64 * plot_width;

        let mut out = String::new();
        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html><head><meta charset=\"utf-8\"><title>{}</title>", escape(&chart.title))?;
        writeln!(
            out,
            "<style>body{{font-family:sans-serif}} rect.bar:hover{{opacity:.8}} .legend span{{display:inline-block;width:12px;height:12px;margin:0 4px 0 12px}}</style>"
        )?;
        writeln!(out, "</head><body>")?;
        writeln!(out, "<h2>{}</h2>", escape(&chart.title))?;
        writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" font-size=\"12\">",
            self.width, height
        )?;

        // Grid and axis labels
        let step = tick_step(total);
        let axis_y = top + rows.len() as u32 * self.row_height;
        let mut tick = 0;
        while tick <= total {
            let tx = left + tick as f64 / total as f64 * plot_width;
            writeln!(
                out,
                "<line x1=\"{tx:.1}\" y1=\"{top}\" x2=\"{tx:.1}\" y2=\"{axis_y}\" stroke=\"#e5e5e5\"/>"
            )?;
            writeln!(
                out,
                "<text x=\"{tx:.1}\" y=\"{}\" text-anchor=\"middle\" fill=\"#444\">{}</text>",
                axis_y + 16,
                format_minutes(tick)
            )?;
            tick += step;
        }

        for (idx, row) in rows.iter().enumerate() {
            let y = top + idx as u32 * self.row_height;
            let color = groups
                .iter()
                .position(|g| *g == row.group_key)
                .map(|i| PALETTE[i % PALETTE.len()])
                .unwrap_or(PALETTE[0]);

            writeln!(
                out,
                "<text x=\"{}\" y=\"{}\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>",
                self.left_margin.saturating_sub(8),
                y + self.row_height / 2,
                escape(row.label)
            )?;

            for interval in &row.intervals {
                let bx = x(interval.start);
                let width = (x(interval.finish) - bx).max(1.0);
                let dash = if interval.degraded {
                    " stroke=\"#d62728\" stroke-dasharray=\"3,2\""
                } else {
                    ""
                };
                writeln!(
                    out,
                    "<rect class=\"bar\" x=\"{bx:.1}\" y=\"{}\" width=\"{width:.1}\" height=\"{}\" fill=\"{color}\"{dash}><title>{} mins</title></rect>",
                    y + 4,
                    self.row_height.saturating_sub(8),
                    interval.duration_minutes
                )?;
            }
        }

        writeln!(out, "</svg>")?;

        write!(out, "<div class=\"legend\">")?;
        for (idx, group) in groups.iter().enumerate() {
            write!(
                out,
                "<span style=\"background:{}\"></span>{}",
                PALETTE[idx % PALETTE.len()],
                escape(group)
            )?;
        }
        writeln!(out, "</div>")?;
        writeln!(out, "</body></html>")?;

        Ok(out)
    }
}

/// Smallest tick spacing that keeps the axis at or under `MAX_TICKS` ticks
fn tick_step(total_minutes: i64) -> i64 {
    TICK_STEPS
        .iter()
        .copied()
        .find(|step| total_minutes / step <= MAX_TICKS)
        .unwrap_or_else(|| (total_minutes / MAX_TICKS).max(1))
}

fn format_minutes(minutes: i64) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;
    use gantry_core::domain::{ANCHOR, ReferenceDate, TaskInterval, Timeline, WorkItemId};

    fn interval(name: &str, date: ReferenceDate, start: i64, minutes: i64) -> TaskInterval {
        TaskInterval {
            label: format!("{}{}", name, date.label_suffix()),
            group_key: name.to_string(),
            work_item: WorkItemId::new(format!("https://ci/job/{name}/")),
            reference_date: date,
            start: ANCHOR + Duration::minutes(start),
            finish: ANCHOR + Duration::minutes(start + minutes),
            duration_minutes: minutes,
            degraded: minutes == 0,
        }
    }

    pub(crate) fn sample_chart() -> GanttChart {
        let early = ReferenceDate::from_ymd(2017, 1, 4).unwrap();
        let late = ReferenceDate::from_ymd(2017, 12, 4).unwrap();
        GanttChart::from_timelines(&[
            Timeline {
                reference_date: early,
                intervals: vec![
                    interval("Build", early, 0, 30),
                    interval("Deploy <prod>", early, 30, 0),
                ],
                degraded: vec![WorkItemId::new("https://ci/job/Deploy <prod>/")],
                finish: ANCHOR + Duration::minutes(30),
            },
            Timeline {
                reference_date: late,
                intervals: vec![interval("Build", late, 0, 45)],
                degraded: Vec::new(),
                finish: ANCHOR + Duration::minutes(45),
            },
        ])
    }

    #[test]
    fn test_render_html() {
        let html = HtmlRenderer::default().render(&sample_chart()).unwrap();

        assert!(html.contains("<h2>Build pipeline timings on 2017-01-04 and 2017-12-04</h2>"));
        assert!(html.contains("<title>30 mins</title>"));
        assert!(html.contains("<title>45 mins</title>"));
        assert!(html.contains("Build 04-01-17"));
        assert!(html.contains("Build 04-12-17"));
        assert_eq!(html.matches("class=\"bar\"").count(), 3);
    }

    #[test]
    fn test_labels_are_escaped() {
        let html = HtmlRenderer::default().render(&sample_chart()).unwrap();
        assert!(html.contains("Deploy &lt;prod&gt; 04-01-17"));
        assert!(!html.contains("Deploy <prod>"));
    }

    #[test]
    fn test_zero_duration_bar_is_visible_and_marked() {
        let html = HtmlRenderer::default().render(&sample_chart()).unwrap();
        assert!(html.contains("stroke-dasharray"));
        assert!(html.contains("<title>0 mins</title>"));
    }

    #[test]
    fn test_narrow_layout_does_not_underflow() {
        let renderer = HtmlRenderer {
            width: 100,
            left_margin: 310,
            right_margin: 10,
            row_height: 4,
        };
        let html = renderer.render(&sample_chart()).unwrap();
        assert_eq!(html.matches("class=\"bar\"").count(), 3);
    }

    #[test]
    fn test_empty_chart_is_rejected() {
        let chart = GanttChart::from_timelines(&[]);
        assert!(matches!(
            HtmlRenderer::default().render(&chart),
            Err(RenderError::Empty)
        ));
    }

    #[test]
    fn test_tick_step() {
        assert_eq!(tick_step(8), 1);
        assert_eq!(tick_step(45), 5);
        assert_eq!(tick_step(600), 60);
        assert_eq!(tick_step(100_000), 10_000);
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(0), "0:00");
        assert_eq!(format_minutes(125), "2:05");
    }
}
