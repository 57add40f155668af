//! # Performance Reporter
//!
//! Presents a `PerformanceComparison`:
//!
//! - `write_metrics` prints the summary statistics as plain text,
//! - `LineChart` renders the cumulative growth curves as an SVG image.

pub mod chart;
pub mod error;
pub mod text;

pub use chart::{save_chart, ChartSeries, LineChart};
pub use error::ReportError;
pub use text::{format_metrics, write_metrics};
