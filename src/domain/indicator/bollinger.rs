//! Bollinger Bands.
//!
//! - Middle: SMA over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! StdDev is the population standard deviation (divides by N, not N-1).
//! Default parameters: period=20, multiplier=2.0. Warmup: first (n-1) entries are `None`.

use crate::domain::indicator::sma::sma;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Rolling population standard deviation.
pub fn stddev(values: &[f64], period: usize) -> Vec<Option<f64>> {
    sma(values, period)
        .into_iter()
        .enumerate()
        .map(|(i, mean)| {
            mean.map(|m| {
                let window = &values[i + 1 - period..=i];
                let variance = window.iter().map(|v| (v - m).powi(2)).sum::<f64>() / period as f64;
                variance.sqrt()
            })
        })
        .collect()
}

pub fn bollinger(values: &[f64], period: usize, multiplier: f64) -> Vec<Option<Band>> {
    sma(values, period)
        .into_iter()
        .zip(stddev(values, period))
        .map(|(mean, sd)| match (mean, sd) {
            (Some(middle), Some(sd)) => Some(Band {
                upper: middle + multiplier * sd,
                middle,
                lower: middle - multiplier * sd,
            }),
            _ => None,
        })
        .collect()
}
