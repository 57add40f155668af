use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write chart to '{path}': {source}")]
    ChartWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Chart has nothing to draw: {0}")]
    EmptyChart(String),
}
