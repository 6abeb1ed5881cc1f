//! Single-position state and completed trades.

use serde::Serialize;
use std::fmt;

use super::ohlcv::PriceBar;
use super::signal::Side;

/// Why a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitReason {
    Signal,
    TakeProfit,
    StopLoss,
    BreakEven,
    TimeStop,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Signal => write!(f, "SIGNAL"),
            ExitReason::TakeProfit => write!(f, "TAKE_PROFIT"),
            ExitReason::StopLoss => write!(f, "STOP_LOSS"),
            ExitReason::BreakEven => write!(f, "BREAK_EVEN"),
            ExitReason::TimeStop => write!(f, "TIME_STOP"),
        }
    }
}

/// An open position. `side` is always `Buy` or `Sell`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenPosition {
    side: Side,
    pub entry_index: usize,
    pub entry_price: f64,
    /// Bar on which the stop moved to break-even, if it has.
    break_even_index: Option<usize>,
}

impl OpenPosition {
    /// `None` for a `Flat` side: flat is the absence of a position.
    pub fn new(side: Side, entry_index: usize, entry_price: f64) -> Option<Self> {
        match side {
            Side::Buy | Side::Sell => Some(Self {
                side,
                entry_index,
                entry_price,
                break_even_index: None,
            }),
            Side::Flat => None,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_long(&self) -> bool {
        self.side == Side::Buy
    }

    pub fn is_short(&self) -> bool {
        self.side == Side::Sell
    }

    /// Signed points gained if closed at `price`.
    pub fn points_at(&self, price: f64) -> f64 {
        if self.is_long() {
            price - self.entry_price
        } else {
            self.entry_price - price
        }
    }

    /// Favourable excursion within `bar` reaches `tp_points`. Disabled when `tp_points <= 0`.
    pub fn should_take_profit(&self, bar: &PriceBar, tp_points: f64) -> bool {
        if tp_points <= 0.0 {
            return false;
        }
        if self.is_long() {
            bar.high - self.entry_price >= tp_points
        } else {
            self.entry_price - bar.low >= tp_points
        }
    }

    /// Adverse excursion within `bar` reaches `sl_points`. Disabled when `sl_points <= 0`.
    pub fn should_stop_loss(&self, bar: &PriceBar, sl_points: f64) -> bool {
        if sl_points <= 0.0 {
            return false;
        }
        if self.is_long() {
            self.entry_price - bar.low >= sl_points
        } else {
            bar.high - self.entry_price >= sl_points
        }
    }

    pub fn break_even_index(&self) -> Option<usize> {
        self.break_even_index
    }

    /// Move the stop to break-even once the favourable excursion in `bar`
    /// reaches `trigger_points`. Arms at most once; `trigger_points <= 0` never arms.
    pub fn arm_break_even(self, index: usize, bar: &PriceBar, trigger_points: f64) -> Self {
        if self.break_even_index.is_some() || trigger_points <= 0.0 {
            return self;
        }
        let excursion = if self.is_long() {
            bar.high - self.entry_price
        } else {
            self.entry_price - bar.low
        };
        if excursion >= trigger_points {
            Self {
                break_even_index: Some(index),
                ..self
            }
        } else {
            self
        }
    }

    /// The armed break-even stop (`entry ± offset_points`) is touched in `bar`.
    /// Only bars after the arming bar count.
    pub fn should_break_even(&self, index: usize, bar: &PriceBar, offset_points: f64) -> bool {
        match self.break_even_index {
            Some(armed) if index > armed => {
                let stop = self.price_offset(offset_points);
                if self.is_long() {
                    bar.low <= stop
                } else {
                    bar.high >= stop
                }
            }
            _ => false,
        }
    }

    /// At least `bars` bars have passed since entry. Disabled when `bars == 0`.
    pub fn should_time_stop(&self, index: usize, bars: usize) -> bool {
        bars > 0 && index.saturating_sub(self.entry_index) >= bars
    }

    /// Price `points` away from entry in the position's favour (negative = against).
    pub fn price_offset(&self, points: f64) -> f64 {
        if self.is_long() {
            self.entry_price + points
        } else {
            self.entry_price - points
        }
    }
}

/// Simulator position state. At most one position is ever open.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PositionState {
    #[default]
    Flat,
    Open(OpenPosition),
}

impl PositionState {
    pub fn is_flat(&self) -> bool {
        matches!(self, PositionState::Flat)
    }

    pub fn open_position(&self) -> Option<&OpenPosition> {
        match self {
            PositionState::Flat => None,
            PositionState::Open(pos) => Some(pos),
        }
    }

    /// Number of open positions: 0 or 1.
    pub fn open_count(&self) -> usize {
        usize::from(!self.is_flat())
    }
}

/// A completed round-trip. Never mutated after emission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub entry_index: usize,
    pub exit_index: usize,
    pub side: Side,
    pub entry_price: f64,
    pub exit_price: f64,
    pub points_pnl: f64,
    pub money_pnl: f64,
    pub exit_reason: ExitReason,
}
