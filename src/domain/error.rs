//! Domain error types.

/// Top-level error type for pulsetrader.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PulseError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        PulseError::InvalidInput {
            reason: reason.into(),
        }
    }
}

impl From<&PulseError> for std::process::ExitCode {
    fn from(err: &PulseError) -> Self {
        let code: u8 = match err {
            PulseError::Io(_) => 1,
            PulseError::ConfigParse { .. } | PulseError::ConfigInvalid { .. } => 2,
            PulseError::Data { .. } | PulseError::Csv(_) => 3,
            PulseError::InvalidInput { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
