//! mf-core: stable foundation for mpcflow.
//!
//! Contains:
//! - numeric (Real + tolerances + time-grid helpers)
//! - record (named signal channels aligned to a shared time axis)
//! - trace (the append-only result trace grown by an emulation run)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod record;
pub mod trace;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use record::{Channel, SignalRecord};
pub use trace::{Trace, TraceChannel};
