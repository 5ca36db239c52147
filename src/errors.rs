use thiserror::Error;

/// Errors surfaced by the forecasting engine and its service layer.
///
/// Numeric aggregation over empty input never errors; it yields zero. The
/// variants here cover boundary failures only: unrecognized method names,
/// invalid records or parameters, and collaborator snapshot reads.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Unknown forecasting method: {0}")]
    UnknownMethod(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Data source error: {0}")]
    SourceError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<validator::ValidationErrors> for ForecastError {
    fn from(err: validator::ValidationErrors) -> Self {
        ForecastError::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn unknown_method_message_names_the_method() {
        let err = ForecastError::UnknownMethod("arima".into());
        assert_eq!(err.to_string(), "Unknown forecasting method: arima");
    }

    #[test]
    fn validation_errors_convert() {
        let mut errors = validator::ValidationErrors::new();
        errors.add("quantity", validator::ValidationError::new("range"));
        let err: ForecastError = errors.into();
        assert_matches!(err, ForecastError::ValidationError(_));
    }
}
