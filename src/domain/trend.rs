//! Trend bias classification from a fast/slow EMA pair.

use std::fmt;

use super::indicator::{ema_windowed, last_valid, previous_valid};

pub const DEFAULT_FAST: usize = 9;
pub const DEFAULT_SLOW: usize = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendBias {
    Up,
    Down,
    Sideways,
}

impl fmt::Display for TrendBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendBias::Up => write!(f, "UP"),
            TrendBias::Down => write!(f, "DOWN"),
            TrendBias::Sideways => write!(f, "SIDEWAYS"),
        }
    }
}

/// Classify the most recent bar.
///
/// - UP: fast above slow, both EMAs rising
/// - DOWN: fast below slow, both EMAs falling
/// - SIDEWAYS: anything else, including too little history
pub fn trend_bias(closes: &[f64], fast_period: usize, slow_period: usize) -> TrendBias {
    if closes.len() < fast_period.max(slow_period) + 2 {
        return TrendBias::Sideways;
    }

    let fast = ema_windowed(closes, fast_period);
    let slow = ema_windowed(closes, slow_period);

    let (Some(f1), Some(f0), Some(s1), Some(s0)) = (
        last_valid(&fast),
        previous_valid(&fast),
        last_valid(&slow),
        previous_valid(&slow),
    ) else {
        return TrendBias::Sideways;
    };

    let fast_slope = f1 - f0;
    let slow_slope = s1 - s0;

    if f1 > s1 && fast_slope > 0.0 && slow_slope > 0.0 {
        TrendBias::Up
    } else if f1 < s1 && fast_slope < 0.0 && slow_slope < 0.0 {
        TrendBias::Down
    } else {
        TrendBias::Sideways
    }
}

pub fn trend_bias_default(closes: &[f64]) -> TrendBias {
    trend_bias(closes, DEFAULT_FAST, DEFAULT_SLOW)
}
