//! The pluggable optimal-control problem.

use mf_core::SignalRecord;

use crate::error::ControlResult;

/// A control plan: control signals on a strictly increasing time axis,
/// produced fresh by each solve.
pub type Plan = SignalRecord;

/// The optimization seam of the engine.
///
/// `formulate` runs exactly once, lazily, before the first solve; use it
/// for expensive structural setup (building a reusable problem template)
/// that must not be repeated. `solve` may be arbitrarily expensive and may
/// fail; failures propagate to the run loop, which does not retry.
pub trait Planner {
    /// State consumed by [`solve`](Self::solve), paired with the
    /// estimator that produces it.
    type State;

    /// One-time setup hook.
    fn formulate(&mut self) -> ControlResult<()> {
        Ok(())
    }

    /// Solve the control problem over the prediction's time axis.
    fn solve(&mut self, state: &Self::State, prediction: &SignalRecord) -> ControlResult<Plan>;
}
