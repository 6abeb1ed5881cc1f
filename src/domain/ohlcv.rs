//! OHLCV price bar representation.

use chrono::NaiveDateTime;

use super::error::PulseError;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub time: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl PriceBar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }

    /// Volume with absent treated as zero.
    pub fn volume_or_zero(&self) -> f64 {
        self.volume.unwrap_or(0.0)
    }

    pub fn is_finite(&self) -> bool {
        self.open.is_finite() && self.high.is_finite() && self.low.is_finite() && self.close.is_finite()
    }
}

pub fn highs(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.high).collect()
}

pub fn lows(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.low).collect()
}

pub fn closes(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

/// Check the input-provider contract: finite OHLC and non-decreasing time.
pub fn validate_bars(bars: &[PriceBar]) -> Result<(), PulseError> {
    for (i, bar) in bars.iter().enumerate() {
        if !bar.is_finite() {
            return Err(PulseError::invalid_input(format!(
                "bar {} at {} has a non-finite price",
                i, bar.time
            )));
        }
        if i > 0 && bar.time < bars[i - 1].time {
            return Err(PulseError::invalid_input(format!(
                "bar {} at {} is earlier than bar {} at {}",
                i,
                bar.time,
                i - 1,
                bars[i - 1].time
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn sample_bar() -> PriceBar {
        PriceBar {
            time: at(10, 0),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: Some(50_000.0),
        }
    }

    #[test]
    fn typical_price() {
        let bar = sample_bar();
        let expected = (110.0 + 90.0 + 105.0) / 3.0;
        assert!((bar.typical_price() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_hl_dominates() {
        let bar = sample_bar();
        // high-low=20, |high-100|=10, |low-100|=10 → 20
        assert!((bar.true_range(100.0) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let bar = sample_bar();
        // high-low=20, |110-70|=40, |90-70|=20 → 40
        assert!((bar.true_range(70.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_down() {
        let bar = sample_bar();
        // high-low=20, |110-130|=20, |90-130|=40 → 40
        assert!((bar.true_range(130.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_volume_is_zero() {
        let bar = PriceBar {
            volume: None,
            ..sample_bar()
        };
        assert_eq!(bar.volume_or_zero(), 0.0);
    }

    #[test]
    fn validate_accepts_equal_timestamps() {
        let bars = vec![sample_bar(), sample_bar()];
        assert!(validate_bars(&bars).is_ok());
    }

    #[test]
    fn validate_rejects_nan_close() {
        let bars = vec![PriceBar {
            close: f64::NAN,
            ..sample_bar()
        }];
        let err = validate_bars(&bars).unwrap_err();
        assert!(matches!(err, PulseError::InvalidInput { .. }));
    }

    #[test]
    fn validate_rejects_time_going_backwards() {
        let bars = vec![
            sample_bar(),
            PriceBar {
                time: at(9, 55),
                ..sample_bar()
            },
        ];
        assert!(validate_bars(&bars).is_err());
    }

    #[test]
    fn column_extractors() {
        let bars = vec![sample_bar()];
        assert_eq!(highs(&bars), vec![110.0]);
        assert_eq!(lows(&bars), vec![90.0]);
        assert_eq!(closes(&bars), vec![105.0]);
    }
}
