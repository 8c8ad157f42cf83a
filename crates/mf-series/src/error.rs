//! Error types for time-series operations.

use mf_core::{CoreError, Real};
use thiserror::Error;

/// Result type for time-series operations.
pub type SeriesResult<T> = Result<T, SeriesError>;

/// Errors that can occur while building or querying a time series.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SeriesError {
    /// Invalid argument provided at construction.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Query time outside the supported extrapolation window.
    #[error("Time {time} outside the supported window [{min}, {max}]")]
    OutOfRange { time: Real, min: Real, max: Real },

    /// Requested signal does not exist.
    #[error("Unknown signal key: {key}")]
    UnknownKey { key: String },

    /// Malformed underlying record.
    #[error(transparent)]
    Record(#[from] CoreError),
}
