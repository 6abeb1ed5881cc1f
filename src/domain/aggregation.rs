//! Resampling minute bars into coarser intraday timeframes.

use chrono::{NaiveDateTime, Timelike};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::ohlcv::PriceBar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Timeframe {
    #[default]
    M1,
    M5,
    M15,
    M30,
    H1,
}

impl Timeframe {
    pub fn minutes(&self) -> u32 {
        match self {
            Timeframe::M1 => 1,
            Timeframe::M5 => 5,
            Timeframe::M15 => 15,
            Timeframe::M30 => 30,
            Timeframe::H1 => 60,
        }
    }

    /// Start of the bucket containing `time`.
    pub fn floor(&self, time: NaiveDateTime) -> NaiveDateTime {
        let minute = time.minute() - time.minute() % self.minutes();
        time.with_minute(minute)
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(time)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::M1 => write!(f, "M1"),
            Timeframe::M5 => write!(f, "M5"),
            Timeframe::M15 => write!(f, "M15"),
            Timeframe::M30 => write!(f, "M30"),
            Timeframe::H1 => write!(f, "H1"),
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "M1" => Ok(Timeframe::M1),
            "M5" => Ok(Timeframe::M5),
            "M15" => Ok(Timeframe::M15),
            "M30" => Ok(Timeframe::M30),
            "H1" | "M60" => Ok(Timeframe::H1),
            other => Err(format!(
                "unknown timeframe '{}' (expected M1, M5, M15, M30 or H1)",
                other
            )),
        }
    }
}

/// Merge `bars` into `timeframe` buckets, ordered by bucket start.
///
/// Open is the first bar's open, close the last bar's close. Volume is summed
/// over bars that carry one and is `None` when none of them do.
pub fn aggregate_bars(bars: &[PriceBar], timeframe: Timeframe) -> Vec<PriceBar> {
    if timeframe == Timeframe::M1 {
        return bars.to_vec();
    }

    let mut buckets: BTreeMap<NaiveDateTime, PriceBar> = BTreeMap::new();

    for bar in bars {
        let key = timeframe.floor(bar.time);
        buckets
            .entry(key)
            .and_modify(|agg| {
                agg.high = agg.high.max(bar.high);
                agg.low = agg.low.min(bar.low);
                agg.close = bar.close;
                agg.volume = match (agg.volume, bar.volume) {
                    (Some(a), Some(b)) => Some(a + b),
                    (a, b) => a.or(b),
                };
            })
            .or_insert_with(|| PriceBar { time: key, ..bar.clone() });
    }

    log::debug!(
        "aggregated {} bars into {} {} bars",
        bars.len(),
        buckets.len(),
        timeframe
    );

    buckets.into_values().collect()
}
