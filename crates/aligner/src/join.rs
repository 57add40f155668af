use crate::error::AlignError;
use crate::series::{to_price_series, SeriesSpec};
use core_types::{AlignedRow, AlignedTable, PriceSeries, RawTable};
use tracing::info;

/// Inner-joins two date-sorted series on exact date equality.
///
/// Dates present in only one series are dropped. If a date repeats, every
/// pairing of the repeated rows is emitted, in input order.
pub fn inner_join(asset: &PriceSeries, benchmark: &PriceSeries) -> Result<AlignedTable, AlignError> {
    let a = &asset.points;
    let b = &benchmark.points;
    let mut rows = Vec::with_capacity(a.len().min(b.len()));

    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let date = a[i].date;
        if date < b[j].date {
            i += 1;
        } else if date > b[j].date {
            j += 1;
        } else {
            let a_end = run_end(a, i, |p| p.date);
            let b_end = run_end(b, j, |p| p.date);
            for left in &a[i..a_end] {
                for right in &b[j..b_end] {
                    rows.push(AlignedRow {
                        date,
                        asset: left.price,
                        benchmark: right.price,
                    });
                }
            }
            i = a_end;
            j = b_end;
        }
    }

    if rows.is_empty() {
        return Err(AlignError::EmptyJoin {
            asset: asset.symbol.clone(),
            benchmark: benchmark.symbol.clone(),
        });
    }

    info!(
        "Aligned {} ({} rows) with {} ({} rows): {} common dates from {} to {}",
        asset.symbol,
        a.len(),
        benchmark.symbol,
        b.len(),
        rows.len(),
        rows[0].date,
        rows[rows.len() - 1].date
    );

    Ok(AlignedTable {
        asset_symbol: asset.symbol.clone(),
        benchmark_symbol: benchmark.symbol.clone(),
        rows,
    })
}

/// End index (exclusive) of the run of equal keys starting at `start`.
fn run_end<T, K: PartialEq>(items: &[T], start: usize, key: impl Fn(&T) -> K) -> usize {
    let first = key(&items[start]);
    let mut end = start + 1;
    while end < items.len() && key(&items[end]) == first {
        end += 1;
    }
    end
}

/// Runs the whole alignment stage: series extraction for both tables, then the join.
pub fn align(
    asset_table: &RawTable,
    asset_spec: &SeriesSpec,
    benchmark_table: &RawTable,
    benchmark_spec: &SeriesSpec,
) -> Result<AlignedTable, AlignError> {
    let asset = to_price_series(asset_table, asset_spec)?;
    let benchmark = to_price_series(benchmark_table, benchmark_spec)?;
    inner_join(&asset, &benchmark)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::PricePoint;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn series(symbol: &str, points: &[(u32, f64)]) -> PriceSeries {
        PriceSeries::new(
            symbol,
            points
                .iter()
                .map(|&(day, price)| PricePoint { date: d(day), price })
                .collect(),
        )
    }

    #[test]
    fn test_join_keeps_only_common_dates() {
        let aapl = series("AAPL", &[(1, 100.0), (2, 102.0), (3, 101.0)]);
        let spx = series("SP500", &[(2, 1010.0), (3, 1005.0), (4, 1000.0)]);
        let table = inner_join(&aapl, &spx).unwrap();

        assert_eq!(table.dates(), vec![d(2), d(3)]);
        assert_eq!(table.asset_prices(), vec![102.0, 101.0]);
        assert_eq!(table.benchmark_prices(), vec![1010.0, 1005.0]);
        assert_eq!(table.asset_symbol, "AAPL");
        assert_eq!(table.benchmark_symbol, "SP500");
    }

    #[test]
    fn test_join_row_count_matches_intersection() {
        let aapl = series(
            "AAPL",
            &[(2, 1.0), (3, 1.0), (5, 1.0), (8, 1.0), (9, 1.0), (10, 1.0)],
        );
        let spx = series("SP500", &[(1, 1.0), (3, 1.0), (4, 1.0), (8, 1.0), (10, 1.0)]);
        let table = inner_join(&aapl, &spx).unwrap();

        assert_eq!(table.len(), 3);
        assert!(table.len() <= aapl.len().min(spx.len()));
        assert!(table.rows.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn test_join_pairs_duplicate_dates() {
        let aapl = series("AAPL", &[(2, 1.0), (2, 2.0), (3, 3.0)]);
        let spx = series("SP500", &[(2, 10.0), (3, 30.0)]);
        let table = inner_join(&aapl, &spx).unwrap();

        let pairs: Vec<(f64, f64)> = table.rows.iter().map(|r| (r.asset, r.benchmark)).collect();
        assert_eq!(pairs, vec![(1.0, 10.0), (2.0, 10.0), (3.0, 30.0)]);
    }

    #[test]
    fn test_disjoint_calendars_are_an_error() {
        let aapl = series("AAPL", &[(1, 1.0), (2, 1.0)]);
        let spx = series("SP500", &[(3, 1.0), (4, 1.0)]);
        assert_eq!(
            inner_join(&aapl, &spx),
            Err(AlignError::EmptyJoin {
                asset: "AAPL".to_string(),
                benchmark: "SP500".to_string(),
            })
        );
    }

    #[test]
    fn test_align_runs_both_tables_independently() {
        let mut aapl = RawTable::new(vec!["Date".into(), "Close".into(), "Adj Close".into()]);
        aapl.push_row(vec!["2024-01-03".into(), "190".into(), "101".into()]).unwrap();
        aapl.push_row(vec!["2024-01-02".into(), "195".into(), "100".into()]).unwrap();

        let mut spx = RawTable::new(vec!["Date".into(), "Close".into()]);
        spx.push_row(vec!["2024-01-02".into(), "4700".into()]).unwrap();
        spx.push_row(vec!["2024-01-03".into(), "4710".into()]).unwrap();

        let table = align(
            &aapl,
            &SeriesSpec::new("AAPL"),
            &spx,
            &SeriesSpec::new("SP500"),
        )
        .unwrap();

        assert_eq!(table.asset_prices(), vec![100.0, 101.0]);
        assert_eq!(table.benchmark_prices(), vec![4700.0, 4710.0]);
    }
}
