//! Emulation and the receding-horizon loop for mpcflow.
//!
//! The [`Backend`] trait is the seam to an external process simulator; the
//! [`Emulator`] wraps one backend and grows the single continuous result
//! trace; [`Mpc`] drives the whole receding-horizon iteration: solve a
//! plan, stitch it onto the disturbance forecast, simulate the near-term
//! window, advance the clock, repeat.

pub mod emulator;
pub mod error;
pub mod mpc;
pub mod step;

pub use emulator::{Backend, Emulator};
pub use error::{SimError, SimResult};
pub use mpc::{Mpc, MpcOptions};
pub use step::{SingleStep, StepPolicy};
