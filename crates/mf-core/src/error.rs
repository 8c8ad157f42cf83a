use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Time axis not strictly increasing at index {index}")]
    TimeNotIncreasing { index: usize },

    #[error("Signal `{key}` has {actual} samples but the time axis has {expected}")]
    LengthMismatch {
        key: String,
        expected: usize,
        actual: usize,
    },

    #[error("Signal `{key}` row {row} has {actual} columns, expected {expected}")]
    RaggedMatrix {
        key: String,
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
