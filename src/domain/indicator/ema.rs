//! Exponential smoothing primitives.
//!
//! k = 2/(n+1), seeded with the first input, then e[i] = e[i-1] + k*(v[i] - e[i-1]).
//! No warm-up gap: output is defined from index 0, unlike a SMA-seeded EMA.
//!
//! Wilder's smoothing is the same recurrence with k = 1/n.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::{closes, PriceBar};

/// Recurrence used by the smoothed indicators (ATR, ADX).
///
/// A single computation uses exactly one convention; the two are not
/// numerically interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Smoothing {
    /// k = 2/(n+1)
    #[default]
    Ema,
    /// k = 1/n
    Wilder,
}

impl Smoothing {
    pub fn factor(self, period: usize) -> f64 {
        let n = period.max(1) as f64;
        match self {
            Smoothing::Ema => 2.0 / (n + 1.0),
            Smoothing::Wilder => 1.0 / n,
        }
    }
}

impl std::str::FromStr for Smoothing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ema" => Ok(Smoothing::Ema),
            "wilder" | "rma" => Ok(Smoothing::Wilder),
            other => Err(format!("unknown smoothing '{}' (expected ema or wilder)", other)),
        }
    }
}

pub fn smooth(values: &[f64], period: usize, smoothing: Smoothing) -> Vec<f64> {
    let k = smoothing.factor(period);
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;

    for &v in values {
        let e = match prev {
            None => v,
            Some(p) => p + k * (v - p),
        };
        out.push(e);
        prev = Some(e);
    }

    out
}

pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    smooth(values, period, Smoothing::Ema)
}

/// EMA with the first (n-1) entries reported as unavailable.
pub fn ema_windowed(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let warmup = period.saturating_sub(1);
    ema(values, period)
        .into_iter()
        .enumerate()
        .map(|(i, e)| if i >= warmup { Some(e) } else { None })
        .collect()
}

pub fn calculate_ema(bars: &[PriceBar], period: usize) -> IndicatorSeries {
    IndicatorSeries::dense(IndicatorType::Ema(period), ema(&closes(bars), period))
}
