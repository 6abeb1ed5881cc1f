//! Discrete trading signals fed into the backtest simulator.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
    Flat,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
            Side::Flat => write!(f, "FLAT"),
        }
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BUY" | "LONG" => Ok(Side::Buy),
            "SELL" | "SHORT" => Ok(Side::Sell),
            "FLAT" | "EXIT" => Ok(Side::Flat),
            other => Err(format!("unknown side '{}' (expected BUY, SELL or FLAT)", other)),
        }
    }
}

/// A signal at a position within the bar sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signal {
    pub index: usize,
    pub side: Side,
}

impl Signal {
    pub fn new(index: usize, side: Side) -> Self {
        Self { index, side }
    }
}
