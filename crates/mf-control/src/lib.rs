//! Control contracts for mpcflow.
//!
//! This crate defines the seams the receding-horizon loop plugs into:
//! state estimation, disturbance prediction, and the optimal-control
//! problem itself. The engine ships working defaults only where a default
//! is meaningful (perfect foresight, no state); the actual optimization is
//! always supplied by the application.
//!
//! # Architecture
//!
//! - A [`Predictor`] forecasts exogenous signals over a horizon grid
//! - A [`StateEstimator`] derives the controller's view of the system from
//!   the accumulated result trace
//! - A [`Planner`] turns state + forecast into a time-indexed [`Plan`],
//!   with a one-time `formulate` hook for expensive structural setup
//! - [`Control`] wires the three together over a [`HorizonConfig`] and an
//!   optional solution history

pub mod control;
pub mod error;
pub mod estimate;
pub mod history;
pub mod horizon;
pub mod plan;
pub mod predict;

pub use control::Control;
pub use error::{ControlError, ControlResult};
pub use estimate::{NoEstimator, StateEstimator, TraceTailEstimator};
pub use history::{HistoryPolicy, SolutionHistory};
pub use horizon::HorizonConfig;
pub use plan::{Plan, Planner};
pub use predict::{PerfectForesight, Predictor};
