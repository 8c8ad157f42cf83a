//! Error types for control operations.

use mf_series::SeriesError;
use thiserror::Error;

/// Result type for control operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while configuring or invoking a controller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// Invalid argument provided at construction.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// State estimation failed.
    #[error("State estimation failed: {message}")]
    Estimation { message: String },

    /// Forecasting the disturbances failed.
    #[error("Prediction failed: {message}")]
    Prediction { message: String },

    /// The delegated optimization failed (infeasibility, solver crash).
    #[error("Solver failed: {message}")]
    Solver { message: String },
}

impl From<SeriesError> for ControlError {
    fn from(e: SeriesError) -> Self {
        ControlError::Prediction {
            message: e.to_string(),
        }
    }
}
