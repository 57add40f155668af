use crate::error::AnalyticsError;
use crate::report::{InstrumentPerformance, MetricsRecord, PerformanceComparison};
use crate::returns::{cumulative_growth, pct_change};
use core_types::AlignedTable;
use tracing::{debug, info};

/// Assumed number of trading days per year.
pub const TRADING_DAYS_PER_YEAR: u32 = 252;

/// A stateless calculator for deriving performance metrics from daily prices.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    trading_days_per_year: u32,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self {
            trading_days_per_year: TRADING_DAYS_PER_YEAR,
        }
    }
}

impl AnalyticsEngine {
    pub fn new(trading_days_per_year: u32) -> Result<Self, AnalyticsError> {
        if trading_days_per_year == 0 {
            return Err(AnalyticsError::InvalidParameter(
                "trading_days_per_year must be positive".to_string(),
            ));
        }
        Ok(Self {
            trading_days_per_year,
        })
    }

    /// The main entry point: measures the asset and the benchmark of an aligned table.
    ///
    /// # Arguments
    ///
    /// * `table` - The date-aligned prices of both instruments.
    /// * `asset_label` / `benchmark_label` - Display names carried into the result.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `PerformanceComparison` or an `AnalyticsError`.
    pub fn compare(
        &self,
        table: &AlignedTable,
        asset_label: &str,
        benchmark_label: &str,
    ) -> Result<PerformanceComparison, AnalyticsError> {
        let asset = self.measure(&table.asset_symbol, asset_label, table.asset_prices())?;
        let benchmark = self.measure(
            &table.benchmark_symbol,
            benchmark_label,
            table.benchmark_prices(),
        )?;

        Ok(PerformanceComparison {
            dates: table.dates(),
            asset,
            benchmark,
        })
    }

    /// Derives returns, growth and metrics for one instrument's aligned prices.
    pub fn measure(
        &self,
        symbol: &str,
        label: &str,
        prices: Vec<f64>,
    ) -> Result<InstrumentPerformance, AnalyticsError> {
        let returns = pct_change(&prices);
        let growth = cumulative_growth(&returns);
        let metrics = self.calculate(&returns).map_err(|e| match e {
            AnalyticsError::NotEnoughData(msg) => {
                AnalyticsError::NotEnoughData(format!("{}: {}", symbol, msg))
            }
            other => other,
        })?;

        let performance = InstrumentPerformance {
            symbol: symbol.to_string(),
            label: label.to_string(),
            prices,
            returns,
            cumulative_growth: growth,
            metrics,
        };
        info!(
            symbol,
            annualized_return = metrics.annualized_return,
            annualized_volatility = metrics.annualized_volatility,
            sharpe_ratio = metrics.sharpe_ratio,
            final_growth = performance.final_growth(),
            "Computed performance metrics"
        );
        Ok(performance)
    }

    /// Annualized return, volatility and Sharpe ratio of a return series.
    ///
    /// Undefined returns are ignored. Volatility uses the sample standard
    /// deviation, so a single defined return gives NaN volatility. The Sharpe
    /// ratio assumes a zero risk-free rate and is left non-finite when the
    /// volatility is zero or NaN.
    pub fn calculate(&self, returns: &[Option<f64>]) -> Result<MetricsRecord, AnalyticsError> {
        let defined: Vec<f64> = returns.iter().flatten().copied().collect();
        if defined.is_empty() {
            return Err(AnalyticsError::NotEnoughData(
                "at least two aligned prices are required".to_string(),
            ));
        }

        let n = defined.len() as f64;
        let mean = defined.iter().sum::<f64>() / n;

        let std_dev = if defined.len() < 2 {
            f64::NAN
        } else {
            let variance = defined
                .iter()
                .map(|r| (r - mean) * (r - mean))
                .sum::<f64>()
                / (n - 1.0);
            variance.sqrt()
        };

        let days = f64::from(self.trading_days_per_year);
        let annualized_return = mean * days;
        let annualized_volatility = std_dev * days.sqrt();
        let sharpe_ratio = annualized_return / annualized_volatility;

        if !sharpe_ratio.is_finite() {
            debug!(
                annualized_return,
                annualized_volatility, "Sharpe ratio is not finite"
            );
        }

        Ok(MetricsRecord {
            annualized_return,
            annualized_volatility,
            sharpe_ratio,
            observations: defined.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use core_types::AlignedRow;

    fn table(asset: &[f64], benchmark: &[f64]) -> AlignedTable {
        AlignedTable {
            asset_symbol: "AAPL".to_string(),
            benchmark_symbol: "SP500".to_string(),
            rows: asset
                .iter()
                .zip(benchmark)
                .enumerate()
                .map(|(i, (&a, &b))| AlignedRow {
                    date: NaiveDate::from_ymd_opt(2024, 1, 2 + i as u32).unwrap(),
                    asset: a,
                    benchmark: b,
                })
                .collect(),
        }
    }

    #[test]
    fn test_three_day_scenario() {
        let engine = AnalyticsEngine::default();
        let result = engine
            .compare(
                &table(&[100.0, 102.0, 101.0], &[1000.0, 1010.0, 1005.0]),
                "Apple (AAPL)",
                "S&P 500",
            )
            .unwrap();

        let aapl = &result.asset;
        assert!(aapl.returns[0].is_none());
        assert_relative_eq!(aapl.returns[1].unwrap(), 0.02, epsilon = 1e-12);
        assert_relative_eq!(aapl.returns[2].unwrap(), -0.0098039215686, epsilon = 1e-10);
        assert_relative_eq!(aapl.final_growth().unwrap(), 1.01, epsilon = 1e-12);

        let spx = &result.benchmark;
        assert!(spx.returns[0].is_none());
        assert_relative_eq!(spx.returns[1].unwrap(), 0.01, epsilon = 1e-12);
        assert_relative_eq!(spx.returns[2].unwrap(), -0.0049504950495, epsilon = 1e-10);
        assert_relative_eq!(spx.final_growth().unwrap(), 1.005, epsilon = 1e-12);

        // mean = (0.02 - 0.0098039) / 2, annualized over 252 days.
        let mean = (0.02 - 1.0 / 102.0) / 2.0;
        assert_relative_eq!(aapl.metrics.annualized_return, mean * 252.0, epsilon = 1e-12);
        let sd = ((0.02 - mean).powi(2) + (-1.0 / 102.0 - mean).powi(2)).sqrt();
        assert_relative_eq!(
            aapl.metrics.annualized_volatility,
            sd * 252f64.sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            aapl.metrics.sharpe_ratio,
            aapl.metrics.annualized_return / aapl.metrics.annualized_volatility,
            epsilon = 1e-12
        );
        assert_eq!(aapl.metrics.observations, 2);
        assert_eq!(aapl.label, "Apple (AAPL)");
        assert_eq!(result.dates.len(), 3);
    }

    #[test]
    fn test_annual_return_scales_with_returns() {
        let engine = AnalyticsEngine::default();
        let base = [None, Some(0.01), Some(-0.004), Some(0.007), Some(0.002)];
        let scaled: Vec<Option<f64>> = base.iter().map(|r| r.map(|r| r * 3.0)).collect();

        let m1 = engine.calculate(&base).unwrap();
        let m3 = engine.calculate(&scaled).unwrap();
        assert_relative_eq!(m3.annualized_return, 3.0 * m1.annualized_return, epsilon = 1e-12);
        assert_relative_eq!(
            m3.annualized_volatility,
            3.0 * m1.annualized_volatility,
            epsilon = 1e-12
        );
        assert_relative_eq!(m3.sharpe_ratio, m1.sharpe_ratio, epsilon = 1e-9);
    }

    #[test]
    fn test_custom_annualization_factor() {
        let engine = AnalyticsEngine::new(365).unwrap();
        let m = engine.calculate(&[None, Some(0.01), Some(0.03)]).unwrap();
        assert_relative_eq!(m.annualized_return, 0.02 * 365.0, epsilon = 1e-12);
        assert!(AnalyticsEngine::new(0).is_err());
    }

    #[test]
    fn test_flat_prices_give_non_finite_sharpe() {
        let engine = AnalyticsEngine::default();
        let perf = engine.measure("FLAT", "Flat", vec![10.0, 10.0, 10.0, 10.0]).unwrap();
        assert_eq!(perf.metrics.annualized_return, 0.0);
        assert_eq!(perf.metrics.annualized_volatility, 0.0);
        // 0 / 0 is propagated as NaN instead of raising.
        assert!(perf.metrics.sharpe_ratio.is_nan());

        // A constant non-zero return has zero volatility and an infinite ratio.
        // 0.5 is exact in binary, so the variance is exactly zero.
        let m = engine.calculate(&[None, Some(0.5), Some(0.5)]).unwrap();
        assert_eq!(m.annualized_return, 126.0);
        assert_eq!(m.annualized_volatility, 0.0);
        assert_eq!(m.sharpe_ratio, f64::INFINITY);

        let m = engine.calculate(&[None, Some(-0.5), Some(-0.5)]).unwrap();
        assert_eq!(m.annualized_volatility, 0.0);
        assert_eq!(m.sharpe_ratio, f64::NEG_INFINITY);
    }

    #[test]
    fn test_single_return_has_undefined_volatility() {
        let engine = AnalyticsEngine::default();
        let m = engine.calculate(&[None, Some(0.05)]).unwrap();
        assert_relative_eq!(m.annualized_return, 0.05 * 252.0, epsilon = 1e-12);
        assert!(m.annualized_volatility.is_nan());
        assert!(m.sharpe_ratio.is_nan());
    }

    #[test]
    fn test_single_row_is_not_enough_data() {
        let engine = AnalyticsEngine::default();
        let err = engine.compare(&table(&[100.0], &[1000.0]), "A", "B").unwrap_err();
        assert!(matches!(err, AnalyticsError::NotEnoughData(msg) if msg.starts_with("AAPL")));
    }
}
