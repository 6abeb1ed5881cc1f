//! Average True Range.
//!
//! TR[0] = high[0] - low[0]
//! TR[i] = max(high[i] - low[i], |high[i] - close[i-1]|, |low[i] - close[i-1]|)
//! ATR = smoothing of TR (EMA by default, see [`Smoothing`]).

use crate::domain::error::PulseError;
use crate::domain::indicator::{smooth, IndicatorSeries, IndicatorType, Smoothing};
use crate::domain::ohlcv::{closes, highs, lows, PriceBar};

pub const DEFAULT_PERIOD: usize = 14;

/// Reject parallel high/low/close inputs of unequal length.
pub(crate) fn check_parallel(high: &[f64], low: &[f64], close: &[f64]) -> Result<(), PulseError> {
    if high.len() != low.len() || high.len() != close.len() {
        return Err(PulseError::invalid_input(format!(
            "parallel series differ in length: high={}, low={}, close={}",
            high.len(),
            low.len(),
            close.len()
        )));
    }
    Ok(())
}

pub(crate) fn true_range_unchecked(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(high.len());
    for i in 0..high.len() {
        let hl = high[i] - low[i];
        if i == 0 {
            tr.push(hl);
        } else {
            let hc = (high[i] - close[i - 1]).abs();
            let lc = (low[i] - close[i - 1]).abs();
            tr.push(hl.max(hc).max(lc));
        }
    }
    tr
}

pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Result<Vec<f64>, PulseError> {
    check_parallel(high, low, close)?;
    Ok(true_range_unchecked(high, low, close))
}

pub fn atr(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
) -> Result<Vec<f64>, PulseError> {
    atr_with(high, low, close, period, Smoothing::Ema)
}

pub fn atr_with(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
    smoothing: Smoothing,
) -> Result<Vec<f64>, PulseError> {
    let tr = true_range(high, low, close)?;
    Ok(smooth(&tr, period, smoothing))
}

pub fn calculate_atr(bars: &[PriceBar], period: usize, smoothing: Smoothing) -> IndicatorSeries {
    let tr = true_range_unchecked(&highs(bars), &lows(bars), &closes(bars));
    IndicatorSeries::dense(IndicatorType::Atr(period), smooth(&tr, period, smoothing))
}
