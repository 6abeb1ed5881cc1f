//! Single-position backtest simulator.
//!
//! The simulator walks the bar sequence once. On each bar it applies the
//! signals for that index in order (entry, or signal-driven exit), and after
//! each of them checks the bar's high/low against the take-profit and
//! stop-loss distances. Bars without a signal still get the intrabar check.
//!
//! Take-profit is checked before stop-loss: when both are reachable inside
//! the same bar, the trade exits at the target.
//!
//! Two optional exits follow, both off by default. Once the favourable
//! excursion reaches `break_even_at_points` the stop moves to
//! `entry ± break_even_offset_points` from the next bar on, replacing the
//! initial stop. `time_stop_bars` closes the trade at the close of the bar
//! that many bars after entry.

use super::error::PulseError;
use super::metrics::TradeSummary;
use super::ohlcv::{validate_bars, PriceBar};
use super::position::{ExitReason, OpenPosition, PositionState, Trade};
use super::signal::{Side, Signal};

/// Simulator parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestParams {
    /// Position size multiplier.
    pub qty: u32,
    /// Points-to-currency conversion.
    pub contract_multiplier: f64,
    /// Stop-loss distance in price points; `<= 0` disables it.
    pub sl_points: f64,
    /// Take-profit distance in price points; `<= 0` disables it.
    pub tp_points: f64,
    /// Favourable excursion that moves the stop to break-even; `<= 0` disables it.
    pub break_even_at_points: f64,
    /// Points beyond entry locked in by the break-even stop.
    pub break_even_offset_points: f64,
    /// Bars after entry before a forced exit at the close; 0 disables it.
    pub time_stop_bars: usize,
}

impl Default for BacktestParams {
    fn default() -> Self {
        BacktestParams {
            qty: 1,
            contract_multiplier: 0.2,
            sl_points: 200.0,
            tp_points: 300.0,
            break_even_at_points: 0.0,
            break_even_offset_points: 0.0,
            time_stop_bars: 0,
        }
    }
}

impl BacktestParams {
    pub fn money(&self, points: f64) -> f64 {
        points * self.contract_multiplier * self.qty as f64
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BacktestResult {
    pub trades: Vec<Trade>,
    pub pnl_points: f64,
    pub pnl_money: f64,
    /// Position still open after the last bar. Not counted in PnL.
    pub open_position: Option<OpenPosition>,
}

impl BacktestResult {
    pub fn summary(&self) -> TradeSummary {
        TradeSummary::compute(&self.trades)
    }

    fn record(&mut self, trade: Trade) {
        self.pnl_points += trade.points_pnl;
        self.pnl_money += trade.money_pnl;
        self.trades.push(trade);
    }
}

fn close(
    pos: &OpenPosition,
    exit_index: usize,
    exit_price: f64,
    points: f64,
    reason: ExitReason,
    params: &BacktestParams,
) -> Trade {
    log::debug!(
        "close {} #{} @ {} -> #{} @ {} ({}, {:+} pts)",
        pos.side(),
        pos.entry_index,
        pos.entry_price,
        exit_index,
        exit_price,
        reason,
        points
    );
    Trade {
        entry_index: pos.entry_index,
        exit_index,
        side: pos.side(),
        entry_price: pos.entry_price,
        exit_price,
        points_pnl: points,
        money_pnl: params.money(points),
        exit_reason: reason,
    }
}

/// Steps 1-2: entry from flat, or signal-driven exit.
pub fn apply_signal(
    state: PositionState,
    signal: &Signal,
    bar: &PriceBar,
    params: &BacktestParams,
) -> (PositionState, Option<Trade>) {
    match (state, signal.side) {
        (PositionState::Flat, Side::Buy | Side::Sell) => {
            match OpenPosition::new(signal.side, signal.index, bar.close) {
                Some(pos) => {
                    log::debug!("open {} #{} @ {}", signal.side, signal.index, bar.close);
                    (PositionState::Open(pos), None)
                }
                None => (PositionState::Flat, None),
            }
        }
        (PositionState::Flat, Side::Flat) => (PositionState::Flat, None),
        (PositionState::Open(pos), Side::Flat) => {
            let exit_price = bar.close;
            let trade = close(
                &pos,
                signal.index,
                exit_price,
                pos.points_at(exit_price),
                ExitReason::Signal,
                params,
            );
            (PositionState::Flat, Some(trade))
        }
        (PositionState::Open(pos), side) => {
            log::warn!(
                "ignoring {} #{} while {} is open",
                side,
                signal.index,
                pos.side()
            );
            (state, None)
        }
    }
}

/// Step 3: intrabar exits. Take-profit, then the stop (break-even once armed,
/// otherwise stop-loss), then the time stop at the close.
pub fn check_exits(
    state: PositionState,
    index: usize,
    bar: &PriceBar,
    params: &BacktestParams,
) -> (PositionState, Option<Trade>) {
    let PositionState::Open(pos) = state else {
        return (state, None);
    };

    if pos.should_take_profit(bar, params.tp_points) {
        let exit_price = pos.price_offset(params.tp_points);
        let trade = close(
            &pos,
            index,
            exit_price,
            params.tp_points,
            ExitReason::TakeProfit,
            params,
        );
        return (PositionState::Flat, Some(trade));
    }

    if pos.should_break_even(index, bar, params.break_even_offset_points) {
        let offset = params.break_even_offset_points;
        let trade = close(
            &pos,
            index,
            pos.price_offset(offset),
            offset,
            ExitReason::BreakEven,
            params,
        );
        return (PositionState::Flat, Some(trade));
    }

    if pos.should_stop_loss(bar, params.sl_points) {
        let exit_price = pos.price_offset(-params.sl_points);
        let trade = close(
            &pos,
            index,
            exit_price,
            -params.sl_points,
            ExitReason::StopLoss,
            params,
        );
        return (PositionState::Flat, Some(trade));
    }

    if pos.should_time_stop(index, params.time_stop_bars) {
        let trade = close(
            &pos,
            index,
            bar.close,
            pos.points_at(bar.close),
            ExitReason::TimeStop,
            params,
        );
        return (PositionState::Flat, Some(trade));
    }

    let armed = pos.arm_break_even(index, bar, params.break_even_at_points);
    if armed.break_even_index() != pos.break_even_index() {
        log::debug!(
            "break-even armed for {} #{} on bar {}",
            pos.side(),
            pos.entry_index,
            index
        );
    }
    (PositionState::Open(armed), None)
}

/// Check the signal-provider contract against `bars`.
pub fn validate_signals(signals: &[Signal], bar_count: usize) -> Result<(), PulseError> {
    for (i, signal) in signals.iter().enumerate() {
        if signal.index >= bar_count {
            return Err(PulseError::invalid_input(format!(
                "signal {} index {} out of range for {} bars",
                i, signal.index, bar_count
            )));
        }
        if i > 0 && signal.index < signals[i - 1].index {
            return Err(PulseError::invalid_input(format!(
                "signal {} index {} precedes previous index {}",
                i,
                signal.index,
                signals[i - 1].index
            )));
        }
    }
    Ok(())
}

/// Replay `signals` against `bars`.
///
/// Inputs are validated before any trade is produced; a contract violation
/// returns `InvalidInput` and no partial result.
pub fn run_backtest(
    bars: &[PriceBar],
    signals: &[Signal],
    params: &BacktestParams,
) -> Result<BacktestResult, PulseError> {
    validate_bars(bars)?;
    validate_signals(signals, bars.len())?;

    let mut result = BacktestResult::default();
    let mut state = PositionState::Flat;
    let mut pending = signals.iter().peekable();

    for (index, bar) in bars.iter().enumerate() {
        let mut had_signal = false;

        while let Some(signal) = pending.next_if(|s| s.index == index) {
            had_signal = true;

            let (next, trade) = apply_signal(state, signal, bar, params);
            if let Some(trade) = trade {
                result.record(trade);
            }

            let (next, trade) = check_exits(next, index, bar, params);
            if let Some(trade) = trade {
                result.record(trade);
            }
            state = next;
        }

        if !had_signal {
            let (next, trade) = check_exits(state, index, bar, params);
            if let Some(trade) = trade {
                result.record(trade);
            }
            state = next;
        }
    }

    result.open_position = state.open_position().copied();

    log::info!(
        "backtest: {} bars, {} signals, {} trades, {:.2} pts, {:.2} money",
        bars.len(),
        signals.len(),
        result.trades.len(),
        result.pnl_points,
        result.pnl_money
    );

    Ok(result)
}
