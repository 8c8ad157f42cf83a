//! Error types for emulation and the run loop.

use thiserror::Error;

/// Errors encountered while emulating or running the receding-horizon
/// loop.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error("Control error: {message}")]
    Control { message: String },

    #[error("Data error: {message}")]
    Data { message: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl From<mf_control::ControlError> for SimError {
    fn from(e: mf_control::ControlError) -> Self {
        SimError::Control {
            message: e.to_string(),
        }
    }
}

impl From<mf_series::SeriesError> for SimError {
    fn from(e: mf_series::SeriesError) -> Self {
        SimError::Data {
            message: e.to_string(),
        }
    }
}

impl From<mf_core::CoreError> for SimError {
    fn from(e: mf_core::CoreError) -> Self {
        SimError::Data {
            message: e.to_string(),
        }
    }
}
