//! # Market Analysis
//!
//! Compares a single equity against a benchmark index: load both price
//! histories, align them on date, measure returns and risk, then print the
//! metrics and chart the growth of one unit invested in each.
//!
//! The stages live in their own workspace crates (`loader`, `aligner`,
//! `analytics`, `reporter`); this crate only wires them together.

pub mod pipeline;

pub use pipeline::{run, RunSummary};
