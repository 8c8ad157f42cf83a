//! State estimation seam.

use std::collections::BTreeMap;

use mf_core::{Real, Trace};

use crate::error::{ControlError, ControlResult};

/// Produces the controller's view of the system at a given time.
///
/// The accumulated result trace is passed in explicitly: estimation for
/// iteration N+1 can only ever see what iteration N actually merged.
/// `State` is consumed opaquely by the paired [`crate::Planner`].
pub trait StateEstimator {
    type State;

    fn estimate(&mut self, time: Real, trace: &Trace) -> ControlResult<Self::State>;
}

/// Placeholder estimator producing no state.
///
/// Pair it with planners whose problem needs no feedback; anything doing
/// real closed-loop control wants its own estimator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEstimator;

impl StateEstimator for NoEstimator {
    type State = ();

    fn estimate(&mut self, _time: Real, _trace: &Trace) -> ControlResult<()> {
        Ok(())
    }
}

/// Estimator reading the most recent sample of selected trace channels.
///
/// The common case for emulator-in-the-loop runs: the simulated state keys
/// at the end of the trace are the state.
#[derive(Debug, Clone)]
pub struct TraceTailEstimator {
    keys: Vec<String>,
}

impl TraceTailEstimator {
    pub fn new(keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }
}

impl StateEstimator for TraceTailEstimator {
    type State = BTreeMap<String, Real>;

    fn estimate(&mut self, _time: Real, trace: &Trace) -> ControlResult<Self::State> {
        let mut state = BTreeMap::new();
        for key in &self.keys {
            let value = trace
                .series(key)
                .and_then(|v| v.last().copied())
                .ok_or_else(|| ControlError::Estimation {
                    message: format!("trace has no samples for `{key}`"),
                })?;
            state.insert(key.clone(), value);
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_estimator_is_empty() {
        let trace = Trace::new();
        NoEstimator.estimate(0.0, &trace).unwrap();
    }

    #[test]
    fn tail_estimator_reads_last_samples() {
        let mut trace = Trace::new();
        trace.merge_time(&[0.0, 10.0]).unwrap();
        trace.merge_series("x", &[295.15, 296.0]).unwrap();

        let mut est = TraceTailEstimator::new(["x"]);
        let state = est.estimate(10.0, &trace).unwrap();
        assert_eq!(state.get("x"), Some(&296.0));
    }

    #[test]
    fn tail_estimator_fails_on_missing_key() {
        let trace = Trace::new();
        let mut est = TraceTailEstimator::new(["missing"]);
        let err = est.estimate(0.0, &trace).unwrap_err();
        assert!(matches!(err, ControlError::Estimation { .. }));
    }
}
