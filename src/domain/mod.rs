//! Core domain types and logic.

pub mod ohlcv;
pub mod signal;
pub mod indicator;
pub mod indicator_helpers;
pub mod trend;
pub mod pattern;
pub mod position;
pub mod backtest;
pub mod metrics;
pub mod aggregation;
pub mod fibonacci;
pub mod config_validation;
pub mod error;
