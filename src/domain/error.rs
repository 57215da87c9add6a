//! Domain error types.

/// Top-level error type for fxtrader.
#[derive(Debug, thiserror::Error)]
pub enum FxTraderError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("invalid bar at index {index}: {reason}")]
    InvalidBar { index: usize, reason: String },

    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FxTraderError {
    /// True for the one failure a caller can recover from by fetching more history.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, FxTraderError::InsufficientData { .. })
    }
}

impl From<&FxTraderError> for std::process::ExitCode {
    fn from(err: &FxTraderError) -> Self {
        let code: u8 = match err {
            FxTraderError::Io(_) => 1,
            FxTraderError::ConfigParse { .. }
            | FxTraderError::ConfigMissing { .. }
            | FxTraderError::ConfigInvalid { .. } => 2,
            FxTraderError::Data { .. } | FxTraderError::InvalidBar { .. } => 3,
            FxTraderError::InsufficientData { .. } => 5,
            FxTraderError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_data_message() {
        let err = FxTraderError::InsufficientData {
            bars: 12,
            minimum: 50,
        };
        assert_eq!(err.to_string(), "insufficient data: have 12 bars, need 50");
        assert!(err.is_insufficient_data());
    }

    #[test]
    fn config_errors_are_not_recoverable_by_refetch() {
        let err = FxTraderError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        };
        assert!(!err.is_insufficient_data());
        assert_eq!(err.to_string(), "missing config key [data] path");
    }

    #[test]
    fn invalid_bar_message() {
        let err = FxTraderError::InvalidBar {
            index: 3,
            reason: "high below low".into(),
        };
        assert_eq!(err.to_string(), "invalid bar at index 3: high below low");
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: FxTraderError = io.into();
        assert!(matches!(err, FxTraderError::Io(_)));
    }
}
