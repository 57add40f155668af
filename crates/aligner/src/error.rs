use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AlignError {
    #[error("Table for {symbol} has none of the columns {candidates:?}")]
    MissingColumn {
        symbol: String,
        candidates: Vec<String>,
    },

    #[error("No usable rows left for {0} after parsing dates and prices")]
    NoUsableRows(String),

    #[error("{asset} and {benchmark} share no common dates")]
    EmptyJoin { asset: String, benchmark: String },
}
