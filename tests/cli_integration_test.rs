//! CLI integration tests.
//!
//! - Typed config construction from real INI files
//! - CSV bars/signals through the adapter into the simulator
//! - Trade CSV output
//! - Command dispatch and exit codes

mod common;

use approx::assert_relative_eq;
use clap::Parser;
use common::*;
use pulsetrader::adapters::csv_adapter::{read_bars, write_trades_file, CsvAdapter};
use pulsetrader::adapters::file_config_adapter::FileConfigAdapter;
use pulsetrader::cli::{self, Cli, Command};
use pulsetrader::domain::aggregation::Timeframe;
use pulsetrader::domain::backtest::BacktestParams;
use pulsetrader::domain::error::PulseError;
use pulsetrader::domain::indicator::Smoothing;
use pulsetrader::ports::data_port::DataPort;
use std::fs;
use std::io::Write;
use std::process::ExitCode;

fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[backtest]
qty = 2
contract_multiplier = 0.5
sl_points = 5
tp_points = 3
break_even_at_points = 2
break_even_offset_points = 0.5
time_stop_bars = 10

[indicators]
ema_fast = 5
ema_slow = 13
atr_period = 10
adx_period = 7
slope_lookback = 4
smoothing = wilder
rsi_period = 6
macd_fast = 4
macd_slow = 8
macd_signal = 3
bollinger_period = 12
bollinger_mult = 1.5
swing_lookback = 20
"#;

const BARS_CSV: &str = "time,open,high,low,close,volume\n\
    2024-01-15 09:00:00,100,101,99,100,10\n\
    2024-01-15 09:01:00,100,105,99,104,20\n\
    2024-01-15 09:02:00,104,104.5,102,103,\n";

mod config_loading {
    use super::*;

    #[test]
    fn build_backtest_params_from_file() {
        let file = write_temp(VALID_INI);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        let params = cli::build_backtest_params(&adapter).unwrap();

        assert_eq!(
            params,
            BacktestParams {
                qty: 2,
                contract_multiplier: 0.5,
                sl_points: 5.0,
                tp_points: 3.0,
                break_even_at_points: 2.0,
                break_even_offset_points: 0.5,
                time_stop_bars: 10,
            }
        );
    }

    #[test]
    fn build_backtest_params_defaults() {
        let adapter = FileConfigAdapter::from_string("").unwrap();
        let params = cli::build_backtest_params(&adapter).unwrap();
        assert_eq!(params, BacktestParams::default());
    }

    #[test]
    fn build_indicator_config_from_file() {
        let file = write_temp(VALID_INI);
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        let cfg = cli::build_indicator_config(&adapter).unwrap();

        assert_eq!(cfg.ema_fast, 5);
        assert_eq!(cfg.ema_slow, 13);
        assert_eq!(cfg.atr_period, 10);
        assert_eq!(cfg.adx_period, 7);
        assert_eq!(cfg.slope_lookback, 4);
        assert_eq!(cfg.smoothing, Smoothing::Wilder);
        assert_eq!(cfg.rsi_period, 6);
        assert_eq!((cfg.macd_fast, cfg.macd_slow, cfg.macd_signal), (4, 8, 3));
        assert_eq!(cfg.bollinger_period, 12);
        assert_eq!(cfg.bollinger_mult, 1.5);
        assert_eq!(cfg.swing_lookback, 20);
    }

    #[test]
    fn decimal_integers_are_rejected_not_defaulted() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\nqty = 2.0\n[indicators]\nema_fast = 5.0\n")
                .unwrap();

        let err = cli::build_backtest_params(&adapter).unwrap_err();
        assert!(matches!(err, PulseError::ConfigInvalid { ref key, .. } if key == "qty"));
        let err = cli::build_indicator_config(&adapter).unwrap_err();
        assert!(matches!(err, PulseError::ConfigInvalid { ref key, .. } if key == "ema_fast"));
    }

    #[test]
    fn invalid_value_is_config_invalid() {
        let adapter = FileConfigAdapter::from_string("[backtest]\nqty = -1\n").unwrap();
        let err = cli::build_backtest_params(&adapter).unwrap_err();
        assert!(matches!(err, PulseError::ConfigInvalid { .. }));
        assert_eq!(ExitCode::from(&err), ExitCode::from(2));
    }

    #[test]
    fn load_config_without_path_is_empty() {
        let adapter = cli::load_config(None).unwrap();
        assert_eq!(
            cli::build_backtest_params(&adapter).unwrap(),
            BacktestParams::default()
        );
    }
}

mod csv_pipeline {
    use super::*;

    #[test]
    fn backtest_from_csv_files() {
        let bars = write_temp(BARS_CSV);
        let sigs = write_temp("index,side\n0,BUY\n");
        let adapter = CsvAdapter::new(bars.path().to_path_buf())
            .with_signals(sigs.path().to_path_buf());

        let result = cli::run_backtest_pipeline(&adapter, &BacktestParams {
            sl_points: 5.0,
            tp_points: 3.0,
            ..BacktestParams::default()
        })
        .unwrap();

        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].exit_price, 103.0);
        assert_relative_eq!(result.pnl_money, 0.6, epsilon = 1e-12);
    }

    #[test]
    fn time_stop_from_config_reaches_trade_csv() {
        let config = FileConfigAdapter::from_string(
            "[backtest]\nsl_points = 0\ntp_points = 0\ntime_stop_bars = 1\n",
        )
        .unwrap();
        let params = cli::build_backtest_params(&config).unwrap();
        let bars = write_temp(BARS_CSV);
        let sigs = write_temp("index,side\n0,SELL\n");
        let adapter = CsvAdapter::new(bars.path().to_path_buf())
            .with_signals(sigs.path().to_path_buf());

        let result = cli::run_backtest_pipeline(&adapter, &params).unwrap();
        assert_eq!(result.trades.len(), 1);
        assert_eq!(result.trades[0].exit_index, 1);
        assert_eq!(result.trades[0].points_pnl, -4.0);

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");
        write_trades_file(&path, &result.trades).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.lines().nth(1).unwrap().ends_with(",TIME_STOP"));
    }

    #[test]
    fn trades_written_to_csv() {
        let bars = bars_from_closes(&[100.0, 101.5, 99.0], 0.25);
        let sigs = signals(&[(0, Side::Buy), (1, Side::Flat), (1, Side::Sell), (2, Side::Flat)]);
        let result = pulsetrader::domain::backtest::run_backtest(
            &bars,
            &sigs,
            &BacktestParams::default(),
        )
        .unwrap();
        assert_eq!(result.trades.len(), 2);

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");
        write_trades_file(&path, &result.trades).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("entry_index,exit_index,side"));
        assert!(lines[1].starts_with("0,1,BUY,"));
        assert!(lines[2].starts_with("1,2,SELL,"));
        assert!(lines[2].ends_with(",SIGNAL"));
    }

    #[test]
    fn mock_and_csv_ports_agree() {
        let file = write_temp(BARS_CSV);
        let from_csv = CsvAdapter::new(file.path().to_path_buf())
            .fetch_bars()
            .unwrap();
        let mock = MockDataPort::new().with_bars(read_bars(BARS_CSV.as_bytes()).unwrap());
        assert_eq!(from_csv, mock.fetch_bars().unwrap());
    }
}

mod dispatch {
    use super::*;

    #[test]
    fn parses_backtest_arguments() {
        let cli = Cli::try_parse_from([
            "pulsetrader",
            "-vv",
            "backtest",
            "--bars",
            "bars.csv",
            "--signals",
            "signals.csv",
            "--output",
            "trades.csv",
        ])
        .unwrap();

        assert_eq!(cli.log_level(), Some(log::LevelFilter::Debug));
        assert!(matches!(cli.command, Command::Backtest { config: None, .. }));
    }

    #[test]
    fn parses_timeframe() {
        let cli = Cli::try_parse_from([
            "pulsetrader",
            "aggregate",
            "--bars",
            "b.csv",
            "--timeframe",
            "m15",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Command::Aggregate {
                timeframe: Timeframe::M15,
                ..
            }
        ));
    }

    #[test]
    fn rejects_unknown_timeframe() {
        let parsed = Cli::try_parse_from([
            "pulsetrader",
            "aggregate",
            "--bars",
            "b.csv",
            "--timeframe",
            "D1",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_bars_file_exits_with_data_code() {
        let cli = Cli::try_parse_from(["pulsetrader", "patterns", "--bars", "/nonexistent/bars.csv"])
            .unwrap();
        assert_eq!(cli::run(cli), ExitCode::from(3));
    }

    #[test]
    fn out_of_range_signal_exits_with_invalid_input_code() {
        let bars = write_temp(BARS_CSV);
        let sigs = write_temp("index,side\n7,BUY\n");
        let cli = Cli::try_parse_from([
            "pulsetrader",
            "backtest",
            "--bars",
            bars.path().to_str().unwrap(),
            "--signals",
            sigs.path().to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(cli::run(cli), ExitCode::from(4));
    }

    #[test]
    fn commands_succeed_on_valid_input() {
        let bars = write_temp(BARS_CSV);
        let path = bars.path().to_str().unwrap();

        for args in [
            vec!["pulsetrader", "indicators", "--bars", path],
            vec!["pulsetrader", "patterns", "--bars", path],
            vec!["pulsetrader", "aggregate", "--bars", path, "--timeframe", "M5"],
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            assert_eq!(cli::run(cli), ExitCode::SUCCESS);
        }
    }
}
