use crate::dates::parse_date;
use crate::error::AlignError;
use core_types::{PricePoint, PriceSeries, RawTable};
use tracing::{debug, info, warn};

/// Which columns of a raw table hold one instrument's dates and prices.
#[derive(Debug, Clone)]
pub struct SeriesSpec {
    pub symbol: String,
    pub date_column: String,
    pub preferred_price_column: String,
    pub fallback_price_column: String,
}

impl SeriesSpec {
    /// A spec using the conventional `Date` / `Adj Close` / `Close` headers.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            date_column: "Date".to_string(),
            preferred_price_column: "Adj Close".to_string(),
            fallback_price_column: "Close".to_string(),
        }
    }
}

/// Picks the price column to use for a table.
///
/// Returns `preferred` if the table has it, otherwise `fallback`, otherwise `None`.
pub fn select_price_column<'a>(
    table: &RawTable,
    preferred: &'a str,
    fallback: &'a str,
) -> Option<&'a str> {
    if table.has_column(preferred) {
        Some(preferred)
    } else if table.has_column(fallback) {
        Some(fallback)
    } else {
        None
    }
}

/// Extracts a date-sorted price series from a raw table.
///
/// Rows whose date does not parse, or whose price is not a finite number,
/// are dropped.
pub fn to_price_series(table: &RawTable, spec: &SeriesSpec) -> Result<PriceSeries, AlignError> {
    let date_idx = table
        .column_index(&spec.date_column)
        .map_err(|_| AlignError::MissingColumn {
            symbol: spec.symbol.clone(),
            candidates: vec![spec.date_column.clone()],
        })?;

    let price_column = select_price_column(
        table,
        &spec.preferred_price_column,
        &spec.fallback_price_column,
    )
    .ok_or_else(|| AlignError::MissingColumn {
        symbol: spec.symbol.clone(),
        candidates: vec![
            spec.preferred_price_column.clone(),
            spec.fallback_price_column.clone(),
        ],
    })?;
    let price_idx = table
        .column_index(price_column)
        .map_err(|_| AlignError::MissingColumn {
            symbol: spec.symbol.clone(),
            candidates: vec![price_column.to_string()],
        })?;
    info!("Using column '{}' as the price for {}", price_column, spec.symbol);

    let mut points = Vec::with_capacity(table.len());
    let mut bad_dates = 0usize;
    let mut bad_prices = 0usize;

    for row in &table.rows {
        let Some(date) = parse_date(&row[date_idx]) else {
            debug!("{}: unparseable date '{}'", spec.symbol, row[date_idx]);
            bad_dates += 1;
            continue;
        };
        match row[price_idx].parse::<f64>() {
            Ok(price) if price.is_finite() => points.push(PricePoint { date, price }),
            _ => {
                debug!("{}: unusable price '{}' on {}", spec.symbol, row[price_idx], date);
                bad_prices += 1;
            }
        }
    }

    if bad_dates + bad_prices > 0 {
        warn!(
            "{}: dropped {} rows with bad dates and {} rows with bad prices",
            spec.symbol, bad_dates, bad_prices
        );
    }
    if points.is_empty() {
        return Err(AlignError::NoUsableRows(spec.symbol.clone()));
    }

    let mut series = PriceSeries::new(spec.symbol.clone(), points);
    series.sort_by_date();
    Ok(series)
}
