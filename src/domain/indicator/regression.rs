//! Linear-regression slope over the most recent points.

pub const DEFAULT_LOOKBACK: usize = 5;

/// OLS slope of the last `min(lookback, len)` values against x = 0..n-1.
///
/// Returns 0 with fewer than two points or a zero x-variance.
pub fn slope(series: &[f64], lookback: usize) -> f64 {
    let n = lookback.min(series.len());
    if n < 2 {
        return 0.0;
    }

    let window = &series[series.len() - n..];
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = window.iter().sum::<f64>() / n as f64;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, &y) in window.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }

    if den == 0.0 { 0.0 } else { num / den }
}
