//! Average Directional Index.
//!
//! upMove = high[i] - high[i-1], downMove = low[i-1] - low[i]
//! +DM = upMove if upMove > downMove and upMove > 0, else 0 (-DM symmetric)
//! +DI = 100 * smooth(+DM) / smooth(TR), -DI symmetric
//! DX  = 100 * |+DI - -DI| / max(+DI + -DI, eps), unavailable when both DI are 0
//! ADX = smooth(DX)
//!
//! TR, both DM series, and DX are all smoothed with the same [`Smoothing`]
//! convention for a given call. Index 0 seeds DM with 0 and TR with the bar
//! range. ADX is `None` until the first available DX and carries its last
//! value across later unavailable DX entries.

use crate::domain::error::PulseError;
use crate::domain::indicator::atr::{check_parallel, true_range_unchecked};
use crate::domain::indicator::{smooth, IndicatorSeries, IndicatorType, Smoothing, EPSILON};
use crate::domain::ohlcv::{closes, highs, lows, PriceBar};

pub const DEFAULT_PERIOD: usize = 14;

/// Full ADX output, all series aligned with the input bars.
#[derive(Debug, Clone, PartialEq)]
pub struct Adx {
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
    pub dx: Vec<Option<f64>>,
    pub adx: Vec<Option<f64>>,
}

fn directional_movement(high: &[f64], low: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let mut plus_dm = Vec::with_capacity(high.len());
    let mut minus_dm = Vec::with_capacity(high.len());

    for i in 0..high.len() {
        if i == 0 {
            plus_dm.push(0.0);
            minus_dm.push(0.0);
            continue;
        }
        let up_move = high[i] - high[i - 1];
        let down_move = low[i - 1] - low[i];
        plus_dm.push(if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        });
        minus_dm.push(if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        });
    }

    (plus_dm, minus_dm)
}

fn compute(high: &[f64], low: &[f64], close: &[f64], period: usize, smoothing: Smoothing) -> Adx {
    let tr = true_range_unchecked(high, low, close);
    let (plus_dm, minus_dm) = directional_movement(high, low);

    let tr_s = smooth(&tr, period, smoothing);
    let plus_s = smooth(&plus_dm, period, smoothing);
    let minus_s = smooth(&minus_dm, period, smoothing);

    let len = high.len();
    let mut plus_di = Vec::with_capacity(len);
    let mut minus_di = Vec::with_capacity(len);
    let mut dx = Vec::with_capacity(len);

    for i in 0..len {
        let trv = tr_s[i].max(EPSILON);
        let p = 100.0 * plus_s[i] / trv;
        let m = 100.0 * minus_s[i] / trv;
        plus_di.push(p);
        minus_di.push(m);
        dx.push(if p == 0.0 && m == 0.0 {
            None
        } else {
            Some(100.0 * (p - m).abs() / (p + m).max(EPSILON))
        });
    }

    let k = smoothing.factor(period);
    let mut adx = Vec::with_capacity(len);
    let mut current: Option<f64> = None;
    for value in &dx {
        if let Some(d) = *value {
            current = Some(match current {
                None => d,
                Some(prev) => prev + k * (d - prev),
            });
        }
        adx.push(current);
    }

    Adx {
        plus_di,
        minus_di,
        dx,
        adx,
    }
}

pub fn adx(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
    smoothing: Smoothing,
) -> Result<Adx, PulseError> {
    check_parallel(high, low, close)?;
    Ok(compute(high, low, close, period, smoothing))
}

pub fn calculate_adx(bars: &[PriceBar], period: usize, smoothing: Smoothing) -> IndicatorSeries {
    let out = compute(&highs(bars), &lows(bars), &closes(bars), period, smoothing);
    IndicatorSeries::new(IndicatorType::Adx(period), out.adx)
}
