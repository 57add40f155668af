use chrono::NaiveDate;

/// The three summary statistics for one instrument.
///
/// Values are plain `f64`; a flat price history yields a non-finite Sharpe
/// ratio rather than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsRecord {
    pub annualized_return: f64,
    pub annualized_volatility: f64,
    pub sharpe_ratio: f64,
    /// Number of defined daily returns the statistics were computed from.
    pub observations: usize,
}

/// Everything derived for one instrument over the aligned window.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentPerformance {
    pub symbol: String,
    /// Display name, e.g. for a chart legend.
    pub label: String,
    pub prices: Vec<f64>,
    pub returns: Vec<Option<f64>>,
    pub cumulative_growth: Vec<Option<f64>>,
    pub metrics: MetricsRecord,
}

impl InstrumentPerformance {
    /// Growth of one unit at the last date, if any return was defined.
    pub fn final_growth(&self) -> Option<f64> {
        self.cumulative_growth.iter().rev().find_map(|g| *g)
    }

    /// The `(date, growth)` pairs with a defined growth value.
    pub fn growth_points(&self, dates: &[NaiveDate]) -> Vec<(NaiveDate, f64)> {
        dates
            .iter()
            .zip(&self.cumulative_growth)
            .filter_map(|(date, g)| g.map(|g| (*date, g)))
            .collect()
    }
}

/// The asset and its benchmark measured over the same dates.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceComparison {
    pub dates: Vec<NaiveDate>,
    pub asset: InstrumentPerformance,
    pub benchmark: InstrumentPerformance,
}

impl PerformanceComparison {
    pub fn instruments(&self) -> [&InstrumentPerformance; 2] {
        [&self.asset, &self.benchmark]
    }
}
