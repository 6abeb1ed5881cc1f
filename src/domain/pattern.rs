//! Single-candle pattern classification from OHLC geometry.

use std::fmt;

use super::indicator::EPSILON;
use super::ohlcv::PriceBar;

/// Body-to-range ratio below which a candle is a doji.
pub const DOJI_BODY_PCT: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternKind {
    Doji,
    Hammer,
    HangingMan,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternKind::Doji => write!(f, "DOJI"),
            PatternKind::Hammer => write!(f, "HAMMER"),
            PatternKind::HangingMan => write!(f, "HANGING_MAN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandlePattern {
    pub kind: PatternKind,
    /// In [0, 1], rounded to 3 decimals.
    pub strength: f64,
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

pub fn detect_patterns(open: f64, high: f64, low: f64, close: f64) -> Vec<CandlePattern> {
    let mut patterns = Vec::new();

    let body = (close - open).abs();
    let range = (high - low).max(EPSILON);
    let upper_shadow = high - open.max(close);
    let lower_shadow = open.min(close) - low;
    let body_pct = body / range;

    if body_pct < DOJI_BODY_PCT {
        patterns.push(CandlePattern {
            kind: PatternKind::Doji,
            strength: round3(1.0 - body_pct),
        });
    }

    if lower_shadow > 2.0 * body && upper_shadow < body {
        let kind = if close > open {
            PatternKind::Hammer
        } else {
            PatternKind::HangingMan
        };
        patterns.push(CandlePattern {
            kind,
            strength: round3((lower_shadow / range).min(1.0)),
        });
    }

    patterns
}

pub fn detect_bar_patterns(bar: &PriceBar) -> Vec<CandlePattern> {
    detect_patterns(bar.open, bar.high, bar.low, bar.close)
}
