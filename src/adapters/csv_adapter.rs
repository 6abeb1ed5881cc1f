//! CSV file adapter for bars, signals and the trade list.
//!
//! Bars: `time,open,high,low,close[,volume]` with a header row. Time is
//! `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or a bare `YYYY-MM-DD`
//! (midnight). An empty or missing volume column is absent volume.
//!
//! Signals: `index,side` with a header row.

use crate::domain::error::PulseError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::position::Trade;
use crate::domain::signal::{Side, Signal};
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

const TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

pub struct CsvAdapter {
    bars_path: PathBuf,
    signals_path: Option<PathBuf>,
}

impl CsvAdapter {
    pub fn new(bars_path: PathBuf) -> Self {
        Self {
            bars_path,
            signals_path: None,
        }
    }

    pub fn with_signals(mut self, signals_path: PathBuf) -> Self {
        self.signals_path = Some(signals_path);
        self
    }

    fn open(path: &Path) -> Result<String, PulseError> {
        fs::read_to_string(path).map_err(|e| PulseError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })
    }
}

impl DataPort for CsvAdapter {
    fn fetch_bars(&self) -> Result<Vec<PriceBar>, PulseError> {
        let content = Self::open(&self.bars_path)?;
        let bars = read_bars(content.as_bytes())?;
        log::debug!("read {} bars from {}", bars.len(), self.bars_path.display());
        Ok(bars)
    }

    fn fetch_signals(&self) -> Result<Vec<Signal>, PulseError> {
        let Some(path) = &self.signals_path else {
            return Ok(Vec::new());
        };
        let content = Self::open(path)?;
        let signals = read_signals(content.as_bytes())?;
        log::debug!("read {} signals from {}", signals.len(), path.display());
        Ok(signals)
    }
}

pub fn parse_time(value: &str) -> Result<NaiveDateTime, PulseError> {
    let value = value.trim();
    for format in TIME_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(t);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| PulseError::Data {
            reason: format!("invalid time '{}'", value),
        })
}

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(input)
}

fn field<'a>(record: &'a csv::StringRecord, idx: usize, name: &str, row: usize) -> Result<&'a str, PulseError> {
    record.get(idx).ok_or_else(|| PulseError::Data {
        reason: format!("row {}: missing {} column", row, name),
    })
}

fn number(record: &csv::StringRecord, idx: usize, name: &str, row: usize) -> Result<f64, PulseError> {
    let raw = field(record, idx, name, row)?;
    raw.parse().map_err(|_| PulseError::Data {
        reason: format!("row {}: invalid {} value '{}'", row, name, raw),
    })
}

pub fn read_bars<R: Read>(input: R) -> Result<Vec<PriceBar>, PulseError> {
    let mut rdr = reader(input);
    let mut bars = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;

        let time = parse_time(field(&record, 0, "time", row)?)?;
        let volume = match record.get(5) {
            None | Some("") => None,
            Some(_) => Some(number(&record, 5, "volume", row)?),
        };

        bars.push(PriceBar {
            time,
            open: number(&record, 1, "open", row)?,
            high: number(&record, 2, "high", row)?,
            low: number(&record, 3, "low", row)?,
            close: number(&record, 4, "close", row)?,
            volume,
        });
    }

    Ok(bars)
}

pub fn read_signals<R: Read>(input: R) -> Result<Vec<Signal>, PulseError> {
    let mut rdr = reader(input);
    let mut signals = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;

        let raw_index = field(&record, 0, "index", row)?;
        let index: usize = raw_index.parse().map_err(|_| PulseError::Data {
            reason: format!("row {}: invalid index '{}'", row, raw_index),
        })?;
        let side: Side = field(&record, 1, "side", row)?
            .parse()
            .map_err(|e| PulseError::Data {
                reason: format!("row {}: {}", row, e),
            })?;

        signals.push(Signal::new(index, side));
    }

    Ok(signals)
}

pub fn write_trades<W: Write>(output: W, trades: &[Trade]) -> Result<(), PulseError> {
    let mut wtr = csv::Writer::from_writer(output);
    for trade in trades {
        wtr.serialize(trade)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_trades_file(path: &Path, trades: &[Trade]) -> Result<(), PulseError> {
    let file = File::create(path)?;
    write_trades(file, trades)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::ExitReason;
    use tempfile::TempDir;

    fn setup_test_data() -> (TempDir, PathBuf, PathBuf) {
        let dir = TempDir::new().unwrap();
        let bars_path = dir.path().join("bars.csv");
        let signals_path = dir.path().join("signals.csv");

        let bars = "time,open,high,low,close,volume\n\
            2024-01-15 09:00:00,100.0,101.0,99.0,100.0,500\n\
            2024-01-15T09:05:00,100.0,105.0,99.0,104.0,\n\
            2024-01-15 09:10:00,104.0,104.5,103.0,103.5,250\n";
        fs::write(&bars_path, bars).unwrap();
        fs::write(&signals_path, "index,side\n0,BUY\n2,flat\n").unwrap();

        (dir, bars_path, signals_path)
    }

    #[test]
    fn fetch_bars_returns_correct_data() {
        let (_dir, bars_path, _) = setup_test_data();
        let bars = CsvAdapter::new(bars_path).fetch_bars().unwrap();

        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].time, parse_time("2024-01-15 09:00:00").unwrap());
        assert_eq!(bars[0].open, 100.0);
        assert_eq!(bars[0].high, 101.0);
        assert_eq!(bars[0].low, 99.0);
        assert_eq!(bars[0].close, 100.0);
        assert_eq!(bars[0].volume, Some(500.0));
        assert_eq!(bars[1].volume, None);
    }

    #[test]
    fn fetch_signals_parses_sides() {
        let (_dir, bars_path, signals_path) = setup_test_data();
        let adapter = CsvAdapter::new(bars_path).with_signals(signals_path);
        let signals = adapter.fetch_signals().unwrap();

        assert_eq!(
            signals,
            vec![Signal::new(0, Side::Buy), Signal::new(2, Side::Flat)]
        );
    }

    #[test]
    fn no_signals_file_means_no_signals() {
        let (_dir, bars_path, _) = setup_test_data();
        assert!(CsvAdapter::new(bars_path).fetch_signals().unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_data_error() {
        let adapter = CsvAdapter::new(PathBuf::from("/nonexistent/bars.csv"));
        let err = adapter.fetch_bars().unwrap_err();
        assert!(matches!(err, PulseError::Data { .. }));
    }

    #[test]
    fn volume_column_is_optional() {
        let bars = read_bars("time,open,high,low,close\n2024-01-15,1,2,0.5,1.5\n".as_bytes()).unwrap();
        assert_eq!(bars[0].volume, None);
        assert_eq!(bars[0].time, parse_time("2024-01-15 00:00:00").unwrap());
    }

    #[test]
    fn bad_price_reports_row() {
        let err = read_bars("time,open,high,low,close\n2024-01-15,1,x,0.5,1.5\n".as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("row 1"));
        assert!(err.to_string().contains("high"));
    }

    #[test]
    fn bad_time_is_rejected() {
        assert!(parse_time("15/01/2024").is_err());
    }

    #[test]
    fn unknown_side_is_rejected() {
        assert!(read_signals("index,side\n0,HOLD\n".as_bytes()).is_err());
    }

    #[test]
    fn write_trades_emits_header_and_labels() {
        let trades = vec![Trade {
            entry_index: 0,
            exit_index: 1,
            side: Side::Buy,
            entry_price: 100.0,
            exit_price: 103.0,
            points_pnl: 3.0,
            money_pnl: 0.6,
            exit_reason: ExitReason::TakeProfit,
        }];
        let mut out = Vec::new();
        write_trades(&mut out, &trades).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("entry_index,exit_index,side,entry_price,exit_price,points_pnl,money_pnl,exit_reason")
        );
        assert_eq!(lines.next(), Some("0,1,BUY,100.0,103.0,3.0,0.6,TAKE_PROFIT"));
    }
}
