//! Trade-level summary statistics.

use serde::Serialize;

use super::position::Trade;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TradeSummary {
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    pub win_rate: f64,
    pub pnl_points: f64,
    pub avg_points: f64,
    pub profit_factor: f64,
    /// Deepest fall of cumulative points below its running peak. Always `<= 0`.
    pub max_drawdown_points: f64,
}

impl TradeSummary {
    pub fn compute(trades: &[Trade]) -> Self {
        let mut wins = 0usize;
        let mut losses = 0usize;
        let mut ties = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut pnl_points = 0.0_f64;

        for trade in trades {
            let pnl = trade.points_pnl;
            pnl_points += pnl;
            if pnl > 0.0 {
                wins += 1;
                total_wins += pnl;
            } else if pnl < 0.0 {
                losses += 1;
                total_losses += pnl.abs();
            } else {
                ties += 1;
            }
        }

        let count = trades.len();
        let win_rate = if count > 0 {
            wins as f64 / count as f64
        } else {
            0.0
        };

        let avg_points = if count > 0 {
            pnl_points / count as f64
        } else {
            0.0
        };

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        TradeSummary {
            trades: count,
            wins,
            losses,
            ties,
            win_rate,
            pnl_points,
            avg_points,
            profit_factor,
            max_drawdown_points: compute_drawdown(trades),
        }
    }
}

fn compute_drawdown(trades: &[Trade]) -> f64 {
    let mut peak = 0.0_f64;
    let mut run = 0.0_f64;
    let mut max_dd = 0.0_f64;

    for trade in trades {
        run += trade.points_pnl;
        peak = peak.max(run);
        max_dd = max_dd.min(run - peak);
    }

    max_dd
}
