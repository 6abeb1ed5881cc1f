//! Configuration validation.
//!
//! Validates config fields before a run. Absent keys fall back to defaults
//! and are not errors; present keys with unusable values are.

use crate::domain::error::PulseError;
use crate::domain::indicator::Smoothing;
use crate::ports::config_port::ConfigPort;

const INDICATOR_PERIODS: [&str; 11] = [
    "ema_fast",
    "ema_slow",
    "atr_period",
    "adx_period",
    "slope_lookback",
    "rsi_period",
    "macd_fast",
    "macd_slow",
    "macd_signal",
    "bollinger_period",
    "swing_lookback",
];

pub fn validate_backtest_params(config: &dyn ConfigPort) -> Result<(), PulseError> {
    validate_qty(config)?;
    validate_positive(config, "backtest", "contract_multiplier")?;
    for key in [
        "sl_points",
        "tp_points",
        "break_even_at_points",
        "break_even_offset_points",
    ] {
        validate_distance(config, key)?;
    }
    validate_break_even(config)?;
    validate_time_stop(config)?;
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), PulseError> {
    for key in INDICATOR_PERIODS {
        validate_period(config, key)?;
    }
    validate_positive(config, "indicators", "bollinger_mult")?;
    validate_smoothing(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: &str) -> PulseError {
    PulseError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

/// Present values must parse as a number; getters would silently default otherwise.
fn raw_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<f64>, PulseError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| invalid(section, key, &format!("'{}' is not a number", raw.trim()))),
    }
}

/// Integer keys follow the same rule as `ConfigPort::get_int`: "2.0" is not an integer.
fn raw_integer(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<i64>, PulseError> {
    match config.get_string(section, key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<i64>().map(Some).map_err(|_| {
            invalid(
                section,
                key,
                &format!("'{}' is not a whole number", raw.trim()),
            )
        }),
    }
}

fn validate_qty(config: &dyn ConfigPort) -> Result<(), PulseError> {
    if let Some(value) = raw_integer(config, "backtest", "qty")? {
        if value < 1 || value > i64::from(u32::MAX) {
            return Err(invalid("backtest", "qty", "qty must be a positive whole number"));
        }
    }
    Ok(())
}

fn validate_positive(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), PulseError> {
    if let Some(value) = raw_number(config, section, key)? {
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(section, key, &format!("{} must be positive", key)));
        }
    }
    Ok(())
}

fn validate_distance(config: &dyn ConfigPort, key: &str) -> Result<(), PulseError> {
    if let Some(value) = raw_number(config, "backtest", key)? {
        if !value.is_finite() || value < 0.0 {
            return Err(invalid(
                "backtest",
                key,
                &format!("{} must be non-negative (0 disables it)", key),
            ));
        }
    }
    Ok(())
}

/// The locked-in offset has to sit below the trigger, or the stop would be
/// placed beyond the price that armed it.
fn validate_break_even(config: &dyn ConfigPort) -> Result<(), PulseError> {
    let trigger = raw_number(config, "backtest", "break_even_at_points")?.unwrap_or(0.0);
    let offset = raw_number(config, "backtest", "break_even_offset_points")?.unwrap_or(0.0);
    if trigger > 0.0 && offset >= trigger {
        return Err(invalid(
            "backtest",
            "break_even_offset_points",
            "break_even_offset_points must be below break_even_at_points",
        ));
    }
    Ok(())
}

fn validate_time_stop(config: &dyn ConfigPort) -> Result<(), PulseError> {
    if let Some(value) = raw_integer(config, "backtest", "time_stop_bars")? {
        if value < 0 {
            return Err(invalid(
                "backtest",
                "time_stop_bars",
                "time_stop_bars must be non-negative (0 disables it)",
            ));
        }
    }
    Ok(())
}

fn validate_period(config: &dyn ConfigPort, key: &str) -> Result<(), PulseError> {
    if let Some(value) = raw_integer(config, "indicators", key)? {
        if value < 1 {
            return Err(invalid(
                "indicators",
                key,
                &format!("{} must be a positive whole number", key),
            ));
        }
    }
    Ok(())
}

fn validate_smoothing(config: &dyn ConfigPort) -> Result<(), PulseError> {
    if let Some(raw) = config.get_string("indicators", "smoothing") {
        raw.parse::<Smoothing>()
            .map_err(|e| invalid("indicators", "smoothing", &e))?;
    }
    Ok(())
}
