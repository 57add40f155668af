use crate::error::ReportError;
use analytics::InstrumentPerformance;
use std::io::Write;

/// Writes the metrics block for each instrument.
///
/// ```text
/// Performance Metrics:
///
/// AAPL_Return
/// Annual Return: 0.2513
/// Annual Volatility: 0.2871
/// Sharpe Ratio: 0.8753
/// ```
pub fn write_metrics<W: Write>(
    out: &mut W,
    instruments: &[&InstrumentPerformance],
) -> Result<(), ReportError> {
    writeln!(out, "Performance Metrics:")?;
    for instrument in instruments {
        let m = &instrument.metrics;
        writeln!(out)?;
        writeln!(out, "{}_Return", instrument.symbol)?;
        writeln!(out, "Annual Return: {:.4}", m.annualized_return)?;
        writeln!(out, "Annual Volatility: {:.4}", m.annualized_volatility)?;
        writeln!(out, "Sharpe Ratio: {:.4}", m.sharpe_ratio)?;
    }
    out.flush()?;
    Ok(())
}

/// Same as `write_metrics`, into a `String`.
pub fn format_metrics(instruments: &[&InstrumentPerformance]) -> Result<String, ReportError> {
    let mut buf = Vec::new();
    write_metrics(&mut buf, instruments)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
