//! # Price File Loader
//!
//! Reads delimited price files into a `RawTable` of named text columns.
//! Rows that do not fit the header are dropped rather than failing the run,
//! and sources that are not UTF-8 can be decoded as Latin-1.

pub mod error;
pub mod reader;

pub use error::LoaderError;
pub use reader::{load_table, LoadOptions};
