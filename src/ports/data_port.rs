//! Input provider for price bars and signals.

use crate::domain::error::PulseError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::signal::Signal;

pub trait DataPort {
    /// Bars in chronological order.
    fn fetch_bars(&self) -> Result<Vec<PriceBar>, PulseError>;

    /// Signals referencing positions in [`DataPort::fetch_bars`].
    fn fetch_signals(&self) -> Result<Vec<Signal>, PulseError>;
}
