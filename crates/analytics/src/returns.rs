/// Simple percentage change between consecutive prices.
///
/// The first element is `None` since it has no prior value.
pub fn pct_change(prices: &[f64]) -> Vec<Option<f64>> {
    let mut returns = Vec::with_capacity(prices.len());
    if prices.is_empty() {
        return returns;
    }
    returns.push(None);
    returns.extend(prices.windows(2).map(|w| Some((w[1] - w[0]) / w[0])));
    returns
}

/// Growth of one unit invested, compounded from the first defined return.
///
/// Undefined returns yield `None` at their position and leave the running
/// product untouched, so the first element of a `pct_change` series maps to
/// `None` and the second to `1 + r[1]`.
pub fn cumulative_growth(returns: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut growth = 1.0;
    returns
        .iter()
        .map(|r| {
            r.map(|r| {
                growth *= 1.0 + r;
                growth
            })
        })
        .collect()
}
