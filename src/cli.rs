//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::{write_trades_file, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::aggregation::{aggregate_bars, Timeframe};
use crate::domain::backtest::{self as backtest_engine, BacktestParams, BacktestResult};
use crate::domain::config_validation::{validate_backtest_params, validate_indicator_config};
use crate::domain::error::PulseError;
use crate::domain::indicator::Smoothing;
use crate::domain::indicator_helpers::{compute_indicators, IndicatorConfig};
use crate::domain::ohlcv::PriceBar;
use crate::domain::pattern::detect_bar_patterns;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "pulsetrader", about = "OHLCV indicators and signal backtester")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay signals against bars with take-profit / stop-loss exits
    Backtest {
        #[arg(short, long)]
        bars: PathBuf,
        #[arg(short, long)]
        signals: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Write the trade list as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print per-bar indicators, the close slope, trend bias and Fibonacci levels
    Indicators {
        #[arg(short, long)]
        bars: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print candle patterns per bar
    Patterns {
        #[arg(short, long)]
        bars: PathBuf,
    },
    /// Resample bars into a coarser timeframe
    Aggregate {
        #[arg(short, long)]
        bars: PathBuf,
        #[arg(short, long)]
        timeframe: Timeframe,
    },
}

impl Cli {
    /// Log filter implied by `-v`; `None` leaves `RUST_LOG` in charge.
    pub fn log_level(&self) -> Option<log::LevelFilter> {
        match self.verbose {
            0 => None,
            1 => Some(log::LevelFilter::Info),
            2 => Some(log::LevelFilter::Debug),
            _ => Some(log::LevelFilter::Trace),
        }
    }
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            bars,
            signals,
            config,
            output,
        } => run_backtest(&bars, &signals, config.as_deref(), output.as_deref()),
        Command::Indicators { bars, config } => run_indicators(&bars, config.as_deref()),
        Command::Patterns { bars } => run_patterns(&bars),
        Command::Aggregate { bars, timeframe } => run_aggregate(&bars, timeframe),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Load an optional INI file; no path means every key takes its default.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, PulseError> {
    match path {
        Some(p) => {
            eprintln!("Loading config from {}", p.display());
            FileConfigAdapter::from_file(p)
        }
        None => FileConfigAdapter::from_string(""),
    }
}

pub fn build_backtest_params(config: &dyn ConfigPort) -> Result<BacktestParams, PulseError> {
    validate_backtest_params(config)?;
    let defaults = BacktestParams::default();

    Ok(BacktestParams {
        qty: config.get_int("backtest", "qty", defaults.qty as i64) as u32,
        contract_multiplier: config.get_double(
            "backtest",
            "contract_multiplier",
            defaults.contract_multiplier,
        ),
        sl_points: config.get_double("backtest", "sl_points", defaults.sl_points),
        tp_points: config.get_double("backtest", "tp_points", defaults.tp_points),
        break_even_at_points: config.get_double(
            "backtest",
            "break_even_at_points",
            defaults.break_even_at_points,
        ),
        break_even_offset_points: config.get_double(
            "backtest",
            "break_even_offset_points",
            defaults.break_even_offset_points,
        ),
        time_stop_bars: config.get_int(
            "backtest",
            "time_stop_bars",
            defaults.time_stop_bars as i64,
        ) as usize,
    })
}

pub fn build_indicator_config(config: &dyn ConfigPort) -> Result<IndicatorConfig, PulseError> {
    validate_indicator_config(config)?;
    let defaults = IndicatorConfig::default();
    let period = |key: &str, default: usize| {
        config.get_int("indicators", key, default as i64) as usize
    };

    let smoothing = match config.get_string("indicators", "smoothing") {
        Some(raw) => raw.parse::<Smoothing>().map_err(|reason| PulseError::ConfigInvalid {
            section: "indicators".into(),
            key: "smoothing".into(),
            reason,
        })?,
        None => defaults.smoothing,
    };

    Ok(IndicatorConfig {
        ema_fast: period("ema_fast", defaults.ema_fast),
        ema_slow: period("ema_slow", defaults.ema_slow),
        atr_period: period("atr_period", defaults.atr_period),
        adx_period: period("adx_period", defaults.adx_period),
        slope_lookback: period("slope_lookback", defaults.slope_lookback),
        smoothing,
        rsi_period: period("rsi_period", defaults.rsi_period),
        macd_fast: period("macd_fast", defaults.macd_fast),
        macd_slow: period("macd_slow", defaults.macd_slow),
        macd_signal: period("macd_signal", defaults.macd_signal),
        bollinger_period: period("bollinger_period", defaults.bollinger_period),
        bollinger_mult: config.get_double("indicators", "bollinger_mult", defaults.bollinger_mult),
        swing_lookback: period("swing_lookback", defaults.swing_lookback),
    })
}

fn load_bars(path: &Path) -> Result<Vec<PriceBar>, PulseError> {
    eprintln!("Loading bars from {}", path.display());
    CsvAdapter::new(path.to_path_buf()).fetch_bars()
}

/// Load, simulate and return the result; shared by the CLI command and tests.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    params: &BacktestParams,
) -> Result<BacktestResult, PulseError> {
    let bars = data_port.fetch_bars()?;
    let signals = data_port.fetch_signals()?;
    eprintln!(
        "Running backtest: {} bars, {} signals (qty {}, multiplier {}, SL {} pts, TP {} pts)",
        bars.len(),
        signals.len(),
        params.qty,
        params.contract_multiplier,
        params.sl_points,
        params.tp_points
    );
    backtest_engine::run_backtest(&bars, &signals, params)
}

fn run_backtest(
    bars_path: &Path,
    signals_path: &Path,
    config_path: Option<&Path>,
    output_path: Option<&Path>,
) -> Result<(), PulseError> {
    // Stage 1: config
    let config = load_config(config_path)?;
    let params = build_backtest_params(&config)?;

    // Stage 2: data + simulation
    eprintln!(
        "Loading bars from {} and signals from {}",
        bars_path.display(),
        signals_path.display()
    );
    let adapter = CsvAdapter::new(bars_path.to_path_buf()).with_signals(signals_path.to_path_buf());
    let result = run_backtest_pipeline(&adapter, &params)?;

    // Stage 3: summary
    let summary = result.summary();
    println!("=== Backtest Results ===");
    println!("Trades:           {}", summary.trades);
    println!(
        "Wins/Losses/Ties: {}/{}/{}",
        summary.wins, summary.losses, summary.ties
    );
    println!("Win Rate:         {:.1}%", summary.win_rate * 100.0);
    println!("PnL (points):     {:.2}", result.pnl_points);
    println!("PnL (money):      {:.2}", result.pnl_money);
    println!("Avg (points):     {:.2}", summary.avg_points);
    println!("Profit Factor:    {:.3}", summary.profit_factor);
    println!("Max Drawdown:     {:.2} pts", summary.max_drawdown_points);
    if let Some(open) = &result.open_position {
        println!(
            "Open position:    {} from bar {} @ {}",
            open.side(),
            open.entry_index,
            open.entry_price
        );
    }

    // Stage 4: trade list
    if let Some(path) = output_path {
        write_trades_file(path, &result.trades)?;
        eprintln!("\nTrades written to: {}", path.display());
    }

    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v))
}

fn run_indicators(bars_path: &Path, config_path: Option<&Path>) -> Result<(), PulseError> {
    let config = load_config(config_path)?;
    let indicator_config = build_indicator_config(&config)?;
    let bars = load_bars(bars_path)?;

    let snap = compute_indicators(&bars, &indicator_config);

    println!(
        "time,ema{},ema{},atr{},adx{},vwap,rsi{},macd,macd_signal,macd_hist,bb_upper,bb_middle,bb_lower",
        indicator_config.ema_fast,
        indicator_config.ema_slow,
        indicator_config.atr_period,
        indicator_config.adx_period,
        indicator_config.rsi_period
    );
    for (i, bar) in bars.iter().enumerate() {
        let band = snap.bollinger[i];
        println!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{}",
            bar.time,
            fmt_opt(snap.ema_fast.get(i)),
            fmt_opt(snap.ema_slow.get(i)),
            fmt_opt(snap.atr.get(i)),
            fmt_opt(snap.adx.get(i)),
            fmt_opt(snap.vwap.get(i)),
            fmt_opt(snap.rsi.get(i)),
            fmt_opt(snap.macd.line[i]),
            fmt_opt(snap.macd.signal[i]),
            fmt_opt(snap.macd.histogram[i]),
            fmt_opt(band.map(|b| b.upper)),
            fmt_opt(band.map(|b| b.middle)),
            fmt_opt(band.map(|b| b.lower)),
        );
    }

    println!(
        "\nClose slope ({} bars): {:.6}",
        indicator_config.slope_lookback, snap.close_slope
    );
    println!("Trend bias: {}", snap.trend);
    if let Some(swing) = snap.swing {
        println!(
            "Fibonacci ({} bar swing {} -> {}):",
            indicator_config.swing_lookback, swing.low, swing.high
        );
        for level in &snap.fib_levels {
            println!("  {:.3}: {:.4}", level.ratio, level.price);
        }
    }
    Ok(())
}

fn run_patterns(bars_path: &Path) -> Result<(), PulseError> {
    let bars = load_bars(bars_path)?;
    let mut found = 0usize;

    for (i, bar) in bars.iter().enumerate() {
        for pattern in detect_bar_patterns(bar) {
            println!("{},{},{},{:.3}", i, bar.time, pattern.kind, pattern.strength);
            found += 1;
        }
    }

    eprintln!("{} patterns in {} bars", found, bars.len());
    Ok(())
}

fn run_aggregate(bars_path: &Path, timeframe: Timeframe) -> Result<(), PulseError> {
    let bars = load_bars(bars_path)?;
    let out = aggregate_bars(&bars, timeframe);

    println!("time,open,high,low,close,volume");
    for bar in &out {
        let volume = bar.volume.map(|v| v.to_string()).unwrap_or_default();
        println!(
            "{},{},{},{},{},{}",
            bar.time.format("%Y-%m-%d %H:%M:%S"),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            volume
        );
    }

    eprintln!("{} bars -> {} {} bars", bars.len(), out.len(), timeframe);
    Ok(())
}
