//! Indicator configuration and the combined per-bar indicator snapshot.

use crate::domain::fibonacci::{self, fibonacci_levels, recent_swing, FibonacciLevel, Swing};
use crate::domain::indicator::adx::{self, calculate_adx};
use crate::domain::indicator::atr::{self, calculate_atr};
use crate::domain::indicator::bollinger::{self, bollinger, Band};
use crate::domain::indicator::ema::calculate_ema;
use crate::domain::indicator::macd::{self, macd, Macd};
use crate::domain::indicator::regression::{self, slope};
use crate::domain::indicator::rsi::{self, rsi};
use crate::domain::indicator::vwap::calculate_vwap;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, Smoothing};
use crate::domain::ohlcv::{closes, highs, lows, PriceBar};
use crate::domain::trend::{self, trend_bias, TrendBias};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorConfig {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub atr_period: usize,
    pub adx_period: usize,
    pub slope_lookback: usize,
    /// Applies to both ATR and ADX.
    pub smoothing: Smoothing,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_mult: f64,
    /// Bars scanned for the Fibonacci swing high/low.
    pub swing_lookback: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        IndicatorConfig {
            ema_fast: trend::DEFAULT_FAST,
            ema_slow: trend::DEFAULT_SLOW,
            atr_period: atr::DEFAULT_PERIOD,
            adx_period: adx::DEFAULT_PERIOD,
            slope_lookback: regression::DEFAULT_LOOKBACK,
            smoothing: Smoothing::Ema,
            rsi_period: rsi::DEFAULT_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            bollinger_period: bollinger::DEFAULT_PERIOD,
            bollinger_mult: bollinger::DEFAULT_MULTIPLIER,
            swing_lookback: fibonacci::DEFAULT_SWING_LOOKBACK,
        }
    }
}

/// Every per-bar field is aligned 1:1 with the input bars.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub ema_fast: IndicatorSeries,
    pub ema_slow: IndicatorSeries,
    pub atr: IndicatorSeries,
    pub adx: IndicatorSeries,
    pub vwap: IndicatorSeries,
    pub rsi: IndicatorSeries,
    pub macd: Macd,
    pub bollinger: Vec<Option<Band>>,
    /// Regression slope of the closes over the configured lookback.
    pub close_slope: f64,
    pub trend: TrendBias,
    /// Swing over the last `swing_lookback` bars; `None` without bars.
    pub swing: Option<Swing>,
    /// Retracement levels of `swing`, empty when there is none.
    pub fib_levels: Vec<FibonacciLevel>,
}

pub fn compute_indicators(bars: &[PriceBar], config: &IndicatorConfig) -> IndicatorSnapshot {
    let close = closes(bars);
    let swing = recent_swing(&highs(bars), &lows(bars), config.swing_lookback);

    IndicatorSnapshot {
        ema_fast: calculate_ema(bars, config.ema_fast),
        ema_slow: calculate_ema(bars, config.ema_slow),
        atr: calculate_atr(bars, config.atr_period, config.smoothing),
        adx: calculate_adx(bars, config.adx_period, config.smoothing),
        vwap: calculate_vwap(bars),
        rsi: IndicatorSeries::new(
            IndicatorType::Rsi(config.rsi_period),
            rsi(&close, config.rsi_period),
        ),
        macd: macd(&close, config.macd_fast, config.macd_slow, config.macd_signal),
        bollinger: bollinger(&close, config.bollinger_period, config.bollinger_mult),
        close_slope: slope(&close, config.slope_lookback),
        trend: trend_bias(&close, config.ema_fast, config.ema_slow),
        swing,
        fib_levels: swing.map_or_else(Vec::new, |s| fibonacci_levels(s.high, s.low)),
    }
}
