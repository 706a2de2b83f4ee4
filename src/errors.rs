use thiserror::Error;

/// Error type shared by the forecasting pipeline and its collaborators.
///
/// Only data access and configuration can fail. Short or degenerate histories are
/// reported through [`crate::diagnostics::Analysis`] markers instead.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Transaction history unavailable: {0}")]
    DataFetch(String),
    #[error("Persistence error: {0}")]
    Storage(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<std::io::Error> for ForecastError {
    fn from(err: std::io::Error) -> Self {
        ForecastError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::Storage(err.to_string())
    }
}
