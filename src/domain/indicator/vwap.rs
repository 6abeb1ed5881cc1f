//! Volume-Weighted Average Price.
//!
//! Cumulative over the whole input, no session reset:
//! vwap[i] = sum(tp*vol) / sum(vol) if sum(vol) > 0, else tp[i].
//! Absent volume counts as zero.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::PriceBar;

pub fn vwap(bars: &[PriceBar]) -> Vec<f64> {
    let mut cum_pv = 0.0;
    let mut cum_v = 0.0;

    bars.iter()
        .map(|bar| {
            let tp = bar.typical_price();
            let vol = bar.volume_or_zero();
            cum_pv += tp * vol;
            cum_v += vol;
            if cum_v > 0.0 { cum_pv / cum_v } else { tp }
        })
        .collect()
}

pub fn calculate_vwap(bars: &[PriceBar]) -> IndicatorSeries {
    IndicatorSeries::dense(IndicatorType::Vwap, vwap(bars))
}
