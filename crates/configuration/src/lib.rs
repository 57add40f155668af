use std::path::Path;
use tracing::debug;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{ChartSettings, Config, InstrumentSource, MetricsSettings};

/// The file looked up in the working directory by `load_config`.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Loads the application configuration from `config.toml`, if it exists.
///
/// A missing file is not an error: the defaults describe the stock
/// AAPL vs S&P 500 run.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(DEFAULT_CONFIG_FILE)
}

/// Loads and validates the configuration from an explicit path.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    debug!(path = %path.display(), exists = path.exists(), "Loading configuration");

    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
