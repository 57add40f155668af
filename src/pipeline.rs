use aligner::SeriesSpec;
use analytics::{AnalyticsEngine, PerformanceComparison};
use anyhow::{Context, Result};
use configuration::{ChartSettings, Config, InstrumentSource};
use core_types::{AlignedTable, RawTable};
use loader::LoadOptions;
use reporter::LineChart;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub comparison: PerformanceComparison,
    pub chart_path: PathBuf,
}

/// Runs the four stages in order, each taking the previous stage's output.
///
/// The metrics report goes to `out`; the chart goes to `config.chart.output_path`.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<RunSummary> {
    let (asset_table, benchmark_table) = load(config)?;
    let aligned = align(config, &asset_table, &benchmark_table)?;
    let comparison = measure(config, &aligned)?;
    let chart_path = report(config, &comparison, out)?;

    Ok(RunSummary {
        comparison,
        chart_path,
    })
}

/// Stage 1: read both source files.
pub fn load(config: &Config) -> Result<(RawTable, RawTable)> {
    let read = |source: &InstrumentSource| {
        let options = LoadOptions::new(source.encoding, source.skip_malformed_rows);
        loader::load_table(&source.path, &options)
            .with_context(|| format!("Failed to load {} prices", source.symbol))
    };
    Ok((read(&config.asset)?, read(&config.benchmark)?))
}

/// Stage 2: extract each price series and inner-join them on date.
pub fn align(config: &Config, asset: &RawTable, benchmark: &RawTable) -> Result<AlignedTable> {
    let aligned = aligner::align(
        asset,
        &series_spec(&config.asset),
        benchmark,
        &series_spec(&config.benchmark),
    )
    .context("Failed to align price series")?;
    Ok(aligned)
}

/// Stage 3: derive returns, growth and summary metrics.
pub fn measure(config: &Config, aligned: &AlignedTable) -> Result<PerformanceComparison> {
    let engine = AnalyticsEngine::new(config.metrics.trading_days_per_year)?;
    let comparison = engine
        .compare(
            aligned,
            config.asset.display_label(),
            config.benchmark.display_label(),
        )
        .context("Failed to compute performance metrics")?;
    Ok(comparison)
}

/// Stage 4: print the metrics and save the growth chart.
pub fn report<W: Write>(
    config: &Config,
    comparison: &PerformanceComparison,
    out: &mut W,
) -> Result<PathBuf> {
    reporter::write_metrics(out, &comparison.instruments())
        .context("Failed to write metrics report")?;

    let chart = growth_chart(&config.chart, comparison);
    let path = reporter::save_chart(&chart, &config.chart.output_path)
        .context("Failed to save growth chart")?;
    info!(
        "Compared {} and {} over {} dates",
        comparison.asset.symbol,
        comparison.benchmark.symbol,
        comparison.dates.len()
    );
    Ok(path)
}

fn growth_chart(settings: &ChartSettings, comparison: &PerformanceComparison) -> LineChart {
    let mut chart = LineChart::new(&settings.title, &settings.x_label, &settings.y_label)
        .with_size(settings.width, settings.height);
    for instrument in comparison.instruments() {
        chart.add_series(
            instrument.label.clone(),
            instrument.growth_points(&comparison.dates),
        );
    }
    chart
}

fn series_spec(source: &InstrumentSource) -> SeriesSpec {
    SeriesSpec {
        symbol: source.symbol.clone(),
        date_column: source.date_column.clone(),
        preferred_price_column: source.preferred_price_column.clone(),
        fallback_price_column: source.fallback_price_column.clone(),
    }
}
