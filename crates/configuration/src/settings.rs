use core_types::TextEncoding;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::ConfigError;

/// The root configuration structure for the entire application.
///
/// Every section falls back to its default when omitted, so an absent
/// `config.toml` reproduces the stock AAPL vs S&P 500 comparison.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub asset: InstrumentSource,
    pub benchmark: InstrumentSource,
    pub metrics: MetricsSettings,
    pub chart: ChartSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset: InstrumentSource {
                symbol: "AAPL".to_string(),
                label: Some("Apple (AAPL)".to_string()),
                path: PathBuf::from("../data/AAPL.csv"),
                encoding: TextEncoding::Utf8,
                skip_malformed_rows: true,
                date_column: default_date_column(),
                preferred_price_column: default_preferred_price_column(),
                fallback_price_column: default_fallback_price_column(),
            },
            benchmark: InstrumentSource {
                symbol: "SP500".to_string(),
                label: Some("S&P 500".to_string()),
                path: PathBuf::from("../data/SP500.csv"),
                encoding: TextEncoding::Latin1,
                skip_malformed_rows: true,
                date_column: default_date_column(),
                preferred_price_column: default_preferred_price_column(),
                fallback_price_column: default_fallback_price_column(),
            },
            metrics: MetricsSettings::default(),
            chart: ChartSettings::default(),
        }
    }
}

impl Config {
    /// Checks the cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.asset.validate("asset")?;
        self.benchmark.validate("benchmark")?;

        if self.asset.symbol == self.benchmark.symbol {
            return Err(ConfigError::ValidationError(format!(
                "asset and benchmark share the symbol '{}'",
                self.asset.symbol
            )));
        }
        if self.metrics.trading_days_per_year == 0 {
            return Err(ConfigError::ValidationError(
                "metrics.trading_days_per_year must be positive".to_string(),
            ));
        }
        if self.chart.width < MIN_CHART_WIDTH || self.chart.height < MIN_CHART_HEIGHT {
            return Err(ConfigError::ValidationError(format!(
                "chart must be at least {}x{} (got {}x{})",
                MIN_CHART_WIDTH, MIN_CHART_HEIGHT, self.chart.width, self.chart.height
            )));
        }
        Ok(())
    }
}

const MIN_CHART_WIDTH: u32 = 200;
const MIN_CHART_HEIGHT: u32 = 150;

/// Where and how to read one instrument's price history.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InstrumentSource {
    /// Short ticker used in the report (e.g., "AAPL").
    pub symbol: String,
    /// Display name for the chart legend. Defaults to the symbol.
    #[serde(default)]
    pub label: Option<String>,
    /// Path to the delimited price file.
    pub path: PathBuf,
    #[serde(default)]
    pub encoding: TextEncoding,
    /// Drop rows that do not parse instead of failing the load.
    #[serde(default = "default_true")]
    pub skip_malformed_rows: bool,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    /// Column used when present, typically the dividend-adjusted close.
    #[serde(default = "default_preferred_price_column")]
    pub preferred_price_column: String,
    #[serde(default = "default_fallback_price_column")]
    pub fallback_price_column: String,
}

impl InstrumentSource {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.symbol)
    }

    fn validate(&self, section: &str) -> Result<(), ConfigError> {
        let required = [
            ("symbol", &self.symbol),
            ("date_column", &self.date_column),
            ("preferred_price_column", &self.preferred_price_column),
            ("fallback_price_column", &self.fallback_price_column),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{}.{} must not be empty",
                    section, key
                )));
            }
        }
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{}.path must not be empty",
                section
            )));
        }
        Ok(())
    }
}

/// Parameters for the metrics engine.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct MetricsSettings {
    /// Annualization factor applied to daily statistics.
    pub trading_days_per_year: u32,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            trading_days_per_year: 252,
        }
    }
}

/// Output location and labelling of the cumulative growth chart.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartSettings {
    pub output_path: PathBuf,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("outputs/plots/apple_vs_sp500.svg"),
            title: "Cumulative Returns: Apple vs S&P 500".to_string(),
            x_label: "Date".to_string(),
            y_label: "Growth of $1".to_string(),
            width: 960,
            height: 540,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_date_column() -> String {
    "Date".to_string()
}

fn default_preferred_price_column() -> String {
    "Adj Close".to_string()
}

fn default_fallback_price_column() -> String {
    "Close".to_string()
}
