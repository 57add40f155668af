//! # Series Aligner
//!
//! Turns two raw tables into a single date-aligned price table:
//!
//! 1. parse each table's date column and pick its price column
//!    (adjusted close when available, plain close otherwise),
//! 2. sort each series by date,
//! 3. inner-join the two series on exact date equality.

pub mod dates;
pub mod error;
pub mod join;
pub mod series;

pub use dates::parse_date;
pub use error::AlignError;
pub use join::{align, inner_join};
pub use series::{select_price_column, to_price_series, SeriesSpec};
