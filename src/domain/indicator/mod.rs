//! Technical indicator implementations.
//!
//! Every indicator is strictly causal: entry `i` of an output depends only on
//! inputs `0..=i`. Warm-up entries are `None`, never a sentinel number.
//!
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: an indicator's values aligned 1:1 with the input bars

pub mod adx;
pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod regression;
pub mod rsi;
pub mod sma;
pub mod vwap;

use std::fmt;

pub use ema::{ema, ema_windowed, smooth, Smoothing};

/// Divide-by-zero guard shared by the ratio-based indicators.
pub const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Atr(usize),
    Adx(usize),
    Vwap,
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn new(indicator_type: IndicatorType, values: Vec<Option<f64>>) -> Self {
        Self {
            indicator_type,
            values,
        }
    }

    /// Wrap a series that is defined from index 0.
    pub fn dense(indicator_type: IndicatorType, values: Vec<f64>) -> Self {
        Self::new(indicator_type, values.into_iter().map(Some).collect())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Most recent available value.
    pub fn last_valid(&self) -> Option<f64> {
        last_valid(&self.values)
    }
}

/// Most recent non-`None` entry.
pub fn last_valid(values: &[Option<f64>]) -> Option<f64> {
    values.iter().rev().find_map(|v| *v)
}

/// Second most recent non-`None` entry.
pub fn previous_valid(values: &[Option<f64>]) -> Option<f64> {
    values.iter().rev().filter_map(|v| *v).nth(1)
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Adx(period) => write!(f, "ADX({})", period),
            IndicatorType::Vwap => write!(f, "VWAP"),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}
