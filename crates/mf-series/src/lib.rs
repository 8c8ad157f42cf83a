//! Time-series engine for mpcflow.
//!
//! Answers "what is signal K at time T" for any T a receding-horizon run
//! can ask about, including times outside the recorded range:
//! - per-key interpolation kind (linear or zero-order hold)
//! - periodic or clamped extrapolation beyond the recorded span, bounded
//!   by a declared extra-time margin
//! - scalar and per-column vector signals
//!
//! Queries are pure; a [`Disturbances`] value is immutable after
//! construction and safe to share between predictors and the run loop.

pub mod disturbances;
pub mod error;
pub mod interp;

pub use disturbances::{Disturbances, Sample, SeriesOptions};
pub use error::{SeriesError, SeriesResult};
pub use interp::Interp;
