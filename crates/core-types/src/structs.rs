use crate::error::CoreError;
use chrono::NaiveDate;

/// A delimited file as it was read from disk: a header row plus data rows of
/// decoded text. Every row has exactly as many fields as the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a data row, rejecting it if its width differs from the header.
    pub fn push_row(&mut self, row: Vec<String>) -> Result<(), CoreError> {
        if row.len() != self.headers.len() {
            return Err(CoreError::InvalidInput(
                "row".to_string(),
                format!("expected {} fields, found {}", self.headers.len(), row.len()),
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.headers.iter().any(|h| h == name)
    }

    pub fn column_index(&self, name: &str) -> Result<usize, CoreError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| CoreError::ColumnNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A single observation of an instrument's price on a trading day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// The price history of one instrument.
///
/// Points are expected in ascending date order once `sort_by_date` has run.
/// Duplicate dates are not removed.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            points,
        }
    }

    /// Sorts ascending by date. Ties keep their input order.
    pub fn sort_by_date(&mut self) {
        self.points.sort_by_key(|p| p.date);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// One date present in both the asset's and the benchmark's history.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlignedRow {
    pub date: NaiveDate,
    pub asset: f64,
    pub benchmark: f64,
}

/// The inner join of two price series on date.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedTable {
    pub asset_symbol: String,
    pub benchmark_symbol: String,
    pub rows: Vec<AlignedRow>,
}

impl AlignedTable {
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.rows.iter().map(|r| r.date).collect()
    }

    pub fn asset_prices(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.asset).collect()
    }

    pub fn benchmark_prices(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.benchmark).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
