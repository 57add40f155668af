//! # Benchmark Analytics Engine
//!
//! This crate turns a date-aligned price table into return series, growth
//! curves and summary statistics for an asset and its benchmark.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O. It depends only on `core-types`.
//! - **Stateless Calculation:** The `AnalyticsEngine` holds only its
//!   annualization factor. It takes an `AlignedTable` as input and produces a
//!   `PerformanceComparison` as output.
//!
//! ## Public API
//!
//! - `pct_change` / `cumulative_growth`: the per-instrument derived series.
//! - `AnalyticsEngine`: the annualized return, volatility and Sharpe ratio.
//! - `MetricsRecord`, `InstrumentPerformance`, `PerformanceComparison`: the results.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

pub mod engine;
pub mod error;
pub mod report;
pub mod returns;

pub use engine::{AnalyticsEngine, TRADING_DAYS_PER_YEAR};
pub use error::AnalyticsError;
pub use report::{InstrumentPerformance, MetricsRecord, PerformanceComparison};
pub use returns::{cumulative_growth, pct_change};
