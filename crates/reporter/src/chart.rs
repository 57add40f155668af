use crate::error::ReportError;
use chrono::{Datelike, NaiveDate};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const PALETTE: [&str; 4] = ["#348dc1", "#ff9933", "#55a868", "#c44e52"];
const AXIS_COLOR: &str = "#333333";
const GRID_COLOR: &str = "#e5e5e5";

const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 44.0;
const MARGIN_BOTTOM: f64 = 56.0;

/// Past this many days the x axis is labelled by year instead of by month.
const YEARLY_TICKS_AFTER_DAYS: i64 = 730;

/// One line on the chart.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub label: String,
    pub color: String,
    pub points: Vec<(NaiveDate, f64)>,
}

/// A titled, labelled line chart with dates on the x axis.
#[derive(Debug, Clone)]
pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
    pub series: Vec<ChartSeries>,
}

impl LineChart {
    pub fn new(title: impl Into<String>, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            width: 960,
            height: 540,
            series: Vec::new(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Adds a line, colouring it from the palette by position.
    pub fn add_series(&mut self, label: impl Into<String>, points: Vec<(NaiveDate, f64)>) {
        let color = PALETTE[self.series.len() % PALETTE.len()].to_string();
        self.series.push(ChartSeries {
            label: label.into(),
            color,
            points,
        });
    }

    /// Renders the chart as a standalone SVG document.
    ///
    /// Non-finite points are skipped. The x axis spans every point's date; when
    /// no value is finite the y axis falls back to `0..2` and no lines are drawn.
    pub fn render_svg(&self) -> Result<String, ReportError> {
        let points = || self.series.iter().flat_map(|s| s.points.iter());
        let (Some(first), Some(last)) = (
            points().map(|(d, _)| *d).min(),
            points().map(|(d, _)| *d).max(),
        ) else {
            return Err(ReportError::EmptyChart(self.title.clone()));
        };
        let (min_v, max_v) = points()
            .map(|(_, v)| *v)
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        let y_axis = if min_v <= max_v {
            YAxis::fit(min_v, max_v)
        } else {
            warn!("Chart '{}' has no finite values to plot", self.title);
            YAxis::fit(0.0, 2.0)
        };

        let frame = Frame {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            right: f64::from(self.width) - MARGIN_RIGHT,
            bottom: f64::from(self.height) - MARGIN_BOTTOM,
            first,
            last,
            y_axis,
        };

        let mut svg = String::new();
        svg.push_str(&svg_header(self.width, self.height));
        self.draw_y_axis(&mut svg, &frame);
        self.draw_x_axis(&mut svg, &frame);
        self.draw_lines(&mut svg, &frame);
        self.draw_legend(&mut svg, &frame);
        self.draw_labels(&mut svg, &frame);
        svg.push_str("</svg>\n");
        Ok(svg)
    }

    fn draw_y_axis(&self, svg: &mut String, frame: &Frame) {
        for tick in frame.y_axis.ticks() {
            let y = frame.y(tick);
            let _ = write!(
                svg,
                r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{GRID_COLOR}" stroke-width="1" />"#,
                x1 = frame.left,
                x2 = frame.right,
            );
            let _ = write!(
                svg,
                r#"<text x="{x:.2}" y="{y:.2}" text-anchor="end" dominant-baseline="middle">{label}</text>"#,
                x = frame.left - 6.0,
                label = frame.y_axis.format(tick),
            );
        }
        let _ = write!(
            svg,
            r#"<line x1="{x:.2}" y1="{y1:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="{AXIS_COLOR}" stroke-width="1" />"#,
            x = frame.left,
            y1 = frame.top,
            y2 = frame.bottom,
        );
    }

    fn draw_x_axis(&self, svg: &mut String, frame: &Frame) {
        let _ = write!(
            svg,
            r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{AXIS_COLOR}" stroke-width="1" />"#,
            x1 = frame.left,
            x2 = frame.right,
            y = frame.bottom,
        );
        for (date, label) in time_ticks(frame.first, frame.last) {
            let x = frame.x(date);
            let _ = write!(
                svg,
                r#"<line x1="{x:.2}" y1="{y1:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="{AXIS_COLOR}" stroke-width="1" />"#,
                y1 = frame.bottom,
                y2 = frame.bottom + 4.0,
            );
            let _ = write!(
                svg,
                r#"<text x="{x:.2}" y="{y:.2}" text-anchor="middle">{label}</text>"#,
                y = frame.bottom + 16.0,
            );
        }
    }

    fn draw_lines(&self, svg: &mut String, frame: &Frame) {
        for series in &self.series {
            let coords: Vec<String> = series
                .points
                .iter()
                .filter(|(_, v)| v.is_finite())
                .map(|(d, v)| format!("{:.2},{:.2}", frame.x(*d), frame.y(*v)))
                .collect();
            if coords.is_empty() {
                continue;
            }
            let _ = write!(
                svg,
                r#"<polyline fill="none" stroke="{color}" stroke-width="1.5" points="{points}" />"#,
                color = series.color,
                points = coords.join(" "),
            );
        }
    }

    fn draw_legend(&self, svg: &mut String, frame: &Frame) {
        let x = frame.left + 12.0;
        let mut y = frame.top + 16.0;
        for series in &self.series {
            let _ = write!(
                svg,
                r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="{color}" stroke-width="2" />"#,
                x1 = x,
                x2 = x + 20.0,
                y = y - 4.0,
                color = series.color,
            );
            let _ = write!(
                svg,
                r#"<text x="{x:.2}" y="{y:.2}" text-anchor="start" fill="{AXIS_COLOR}">{label}</text>"#,
                x = x + 26.0,
                label = escape_xml(&series.label),
            );
            y += 16.0;
        }
    }

    fn draw_labels(&self, svg: &mut String, frame: &Frame) {
        let center_x = (frame.left + frame.right) / 2.0;
        let center_y = (frame.top + frame.bottom) / 2.0;
        let _ = write!(
            svg,
            r#"<text x="{center_x:.2}" y="{y:.2}" text-anchor="middle" font-size="16" fill="{AXIS_COLOR}">{title}</text>"#,
            y = frame.top / 2.0 + 6.0,
            title = escape_xml(&self.title),
        );
        let _ = write!(
            svg,
            r#"<text x="{center_x:.2}" y="{y:.2}" text-anchor="middle" font-size="12" fill="{AXIS_COLOR}">{label}</text>"#,
            y = f64::from(self.height) - 14.0,
            label = escape_xml(&self.x_label),
        );
        let _ = write!(
            svg,
            r#"<text x="18" y="{center_y:.2}" text-anchor="middle" font-size="12" fill="{AXIS_COLOR}" transform="rotate(-90 18 {center_y:.2})">{label}</text>"#,
            label = escape_xml(&self.y_label),
        );
    }
}

/// Writes the chart as SVG, creating missing parent directories.
pub fn save_chart(chart: &LineChart, path: impl AsRef<Path>) -> Result<PathBuf, ReportError> {
    let path = path.as_ref();
    let svg = chart.render_svg()?;

    let write_err = |source: std::io::Error| ReportError::ChartWrite {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(path, svg).map_err(write_err)?;

    info!("Chart saved to {}", path.display());
    Ok(path.to_path_buf())
}

/// Plot area in pixels plus the data ranges mapped onto it.
struct Frame {
    left: f64,
    top: f64,
    right: f64,
    bottom: f64,
    first: NaiveDate,
    last: NaiveDate,
    y_axis: YAxis,
}

impl Frame {
    fn x(&self, date: NaiveDate) -> f64 {
        let span = (self.last - self.first).num_days();
        if span == 0 {
            return (self.left + self.right) / 2.0;
        }
        let offset = (date - self.first).num_days() as f64;
        self.left + offset / span as f64 * (self.right - self.left)
    }

    fn y(&self, value: f64) -> f64 {
        let norm = (value - self.y_axis.min) / (self.y_axis.max - self.y_axis.min);
        self.bottom - norm * (self.bottom - self.top)
    }
}

/// A y range rounded out to whole tick steps.
struct YAxis {
    min: f64,
    max: f64,
    step: f64,
}

impl YAxis {
    fn fit(min_v: f64, max_v: f64) -> Self {
        let (mut lo, mut hi) = (min_v, max_v);
        if lo == hi {
            // widen flat ranges
            let adjust = if lo == 0.0 { 1.0 } else { lo.abs() * 0.1 };
            lo -= adjust;
            hi += adjust;
        }
        let step = nice_step((hi - lo) / 5.0);
        Self {
            min: (lo / step).floor() * step,
            max: (hi / step).ceil() * step,
            step,
        }
    }

    fn ticks(&self) -> Vec<f64> {
        let count = ((self.max - self.min) / self.step).round() as usize;
        (0..=count).map(|i| self.min + i as f64 * self.step).collect()
    }

    fn format(&self, value: f64) -> String {
        let decimals = (-(self.step.log10() + 1e-9).floor()).max(0.0) as usize;
        format!("{:.*}", decimals, value)
    }
}

/// Rounds a raw step up to 1, 2 or 5 times a power of ten.
fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let fraction = raw / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick dates and labels: the first of each month or, for long ranges, of each year.
fn time_ticks(first: NaiveDate, last: NaiveDate) -> Vec<(NaiveDate, String)> {
    let yearly = (last - first).num_days() > YEARLY_TICKS_AFTER_DAYS;
    let mut ticks = Vec::new();
    let (mut year, mut month) = (first.year(), first.month());
    if yearly {
        month = 1;
    }

    while let Some(date) = NaiveDate::from_ymd_opt(year, month, 1) {
        if date > last {
            break;
        }
        if date >= first {
            let label = if yearly {
                date.format("%Y").to_string()
            } else {
                date.format("%Y-%m").to_string()
            };
            ticks.push((date, label));
        }
        if yearly || month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    if ticks.is_empty() {
        ticks.push((first, first.format("%Y-%m-%d").to_string()));
    }
    ticks
}

fn svg_header(width: u32, height: u32) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><style>text{{font-family:Arial,sans-serif;font-size:10px;fill:#666}}</style><rect width="100%" height="100%" fill="#ffffff" />"##,
        w = width,
        h = height
    )
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_chart() -> LineChart {
        let mut chart = LineChart::new("Cumulative Returns: Apple vs S&P 500", "Date", "Growth of $1");
        chart.add_series(
            "Apple (AAPL)",
            vec![(d(2024, 1, 3), 1.02), (d(2024, 2, 15), 1.01), (d(2024, 3, 28), 1.12)],
        );
        chart.add_series(
            "S&P 500",
            vec![(d(2024, 1, 3), 1.01), (d(2024, 2, 15), f64::NAN), (d(2024, 3, 28), 1.04)],
        );
        chart
    }

    #[test]
    fn test_render_contains_lines_labels_and_legend() {
        let svg = sample_chart().render_svg().unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains("Cumulative Returns: Apple vs S&amp;P 500"));
        assert!(svg.contains("Growth of $1"));
        assert!(svg.contains(">Date<"));
        assert!(svg.contains("Apple (AAPL)"));
        assert!(svg.contains("S&amp;P 500"));
        assert!(svg.contains(">2024-02<"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_chart_without_points_is_an_error() {
        let mut chart = LineChart::new("t", "x", "y");
        chart.add_series("none", Vec::new());
        assert!(matches!(chart.render_svg(), Err(ReportError::EmptyChart(_))));
    }

    #[test]
    fn test_non_finite_series_render_axes_only() {
        let mut chart = LineChart::new("Growth & Loss", "Date", "Growth of $1");
        chart.add_series("A", vec![(d(2024, 1, 3), f64::INFINITY), (d(2024, 3, 4), f64::INFINITY)]);
        chart.add_series("B", vec![(d(2024, 1, 3), f64::NAN)]);

        let svg = chart.render_svg().unwrap();
        assert_eq!(svg.matches("<polyline").count(), 0);
        assert!(svg.contains("Growth &amp; Loss"));
        assert!(svg.contains(">A<"));
        assert!(svg.contains(">B<"));
        assert!(svg.contains(">2024-02<"));
        assert!(svg.contains(">0.0<") && svg.contains(">2.0<"), "{}", svg);
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outputs").join("plots").join("chart.svg");
        let written = save_chart(&sample_chart(), &path).unwrap();
        assert_eq!(written, path);
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("<polyline"));

        // Saving again overwrites.
        save_chart(&sample_chart().with_size(400, 300), &path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains(r#"width="400""#));
    }

    #[test]
    fn test_y_axis_rounds_to_nice_steps() {
        let axis = YAxis::fit(0.93, 1.37);
        assert!(axis.min <= 0.93 && axis.max >= 1.37);
        assert!((axis.step - 0.1).abs() < 1e-12);
        assert_eq!(axis.format(1.2), "1.2");

        let flat = YAxis::fit(1.0, 1.0);
        assert!(flat.min < 1.0 && flat.max > 1.0);
    }

    #[test]
    fn test_time_ticks_switch_to_years() {
        let monthly = time_ticks(d(2024, 1, 15), d(2024, 4, 2));
        let labels: Vec<&str> = monthly.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(labels, vec!["2024-02", "2024-03", "2024-04"]);

        let yearly = time_ticks(d(2019, 6, 1), d(2023, 2, 1));
        let labels: Vec<&str> = yearly.iter().map(|(_, l)| l.as_str()).collect();
        assert_eq!(labels, vec!["2020", "2021", "2022", "2023"]);

        let short = time_ticks(d(2024, 1, 10), d(2024, 1, 20));
        assert_eq!(short.len(), 1);
    }
}
