//! Fibonacci retracement levels over a recent swing.

pub const DEFAULT_SWING_LOOKBACK: usize = 50;

/// Retracement ratios, shallow to deep.
pub const RATIOS: [f64; 7] = [0.0, 0.236, 0.382, 0.5, 0.618, 0.786, 1.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swing {
    pub high: f64,
    pub low: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FibonacciLevel {
    pub ratio: f64,
    pub price: f64,
}

/// Retracement prices measured down from `swing_high`.
///
/// The 0 level is pinned to `swing_low` and the 1 level to `swing_high`;
/// every intermediate level is `swing_high - (swing_high - swing_low) * ratio`.
pub fn fibonacci_levels(swing_high: f64, swing_low: f64) -> Vec<FibonacciLevel> {
    let diff = swing_high - swing_low;
    RATIOS
        .iter()
        .map(|&ratio| {
            let price = if ratio == 0.0 {
                swing_low
            } else if ratio == 1.0 {
                swing_high
            } else {
                swing_high - diff * ratio
            };
            FibonacciLevel { ratio, price }
        })
        .collect()
}

/// Highest high and lowest low over the last `lookback` bars.
/// `None` when either series is empty or `lookback` is 0.
pub fn recent_swing(highs: &[f64], lows: &[f64], lookback: usize) -> Option<Swing> {
    if lookback == 0 {
        return None;
    }
    let h = &highs[highs.len().saturating_sub(lookback)..];
    let l = &lows[lows.len().saturating_sub(lookback)..];

    let high = h.iter().copied().reduce(f64::max)?;
    let low = l.iter().copied().reduce(f64::min)?;
    Some(Swing { high, low })
}
