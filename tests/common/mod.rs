#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use pulsetrader::domain::error::PulseError;
pub use pulsetrader::domain::ohlcv::PriceBar;
pub use pulsetrader::domain::signal::{Side, Signal};
use pulsetrader::ports::data_port::DataPort;

pub struct MockDataPort {
    pub bars: Vec<PriceBar>,
    pub signals: Vec<Signal>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: Vec::new(),
            signals: Vec::new(),
            error: None,
        }
    }

    pub fn with_bars(mut self, bars: Vec<PriceBar>) -> Self {
        self.bars = bars;
        self
    }

    pub fn with_signals(mut self, signals: Vec<Signal>) -> Self {
        self.signals = signals;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(&self) -> Result<Vec<PriceBar>, PulseError> {
        if let Some(reason) = &self.error {
            return Err(PulseError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.bars.clone())
    }

    fn fetch_signals(&self) -> Result<Vec<Signal>, PulseError> {
        Ok(self.signals.clone())
    }
}

pub fn minute(i: usize) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
        + chrono::Duration::minutes(i as i64)
}

pub fn make_bar(i: usize, open: f64, high: f64, low: f64, close: f64) -> PriceBar {
    PriceBar {
        time: minute(i),
        open,
        high,
        low,
        close,
        volume: Some(1_000.0),
    }
}

/// Bars with open = close and a fixed +/- spread around the close.
pub fn bars_from_closes(closes: &[f64], spread: f64) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| make_bar(i, c, c + spread, c - spread, c))
        .collect()
}

pub fn signals(pairs: &[(usize, Side)]) -> Vec<Signal> {
    pairs.iter().map(|&(i, s)| Signal::new(i, s)).collect()
}
