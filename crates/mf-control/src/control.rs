//! Controller orchestration: estimate, predict, formulate once, solve.

use mf_core::{Real, Trace};

use crate::error::ControlResult;
use crate::estimate::StateEstimator;
use crate::history::{HistoryPolicy, SolutionHistory};
use crate::horizon::HorizonConfig;
use crate::plan::{Plan, Planner};
use crate::predict::Predictor;

/// A receding-horizon controller.
///
/// Generic over its estimator, predictor and planner for static dispatch;
/// the planner's `State` must match the estimator's, which is checked at
/// compile time rather than at the first solve.
pub struct Control<E, P, L> {
    estimator: E,
    predictor: P,
    planner: L,
    config: HorizonConfig,
    history: SolutionHistory,
    formulated: bool,
}

impl<E, P, L> Control<E, P, L>
where
    E: StateEstimator,
    P: Predictor,
    L: Planner<State = E::State>,
{
    pub fn new(estimator: E, predictor: P, planner: L, config: HorizonConfig) -> Self {
        Self {
            estimator,
            predictor,
            planner,
            config,
            history: SolutionHistory::default(),
            formulated: false,
        }
    }

    /// Retain solved plans under the given policy.
    pub fn with_history(mut self, policy: HistoryPolicy) -> Self {
        self.history = SolutionHistory::new(policy);
        self
    }

    pub fn config(&self) -> &HorizonConfig {
        &self.config
    }

    /// Real-time advance per receding step.
    pub fn receding(&self) -> Real {
        self.config.receding
    }

    /// The horizon grid for a solve starting at `starttime`.
    pub fn time_grid(&self, starttime: Real) -> Vec<Real> {
        self.config.time_grid(starttime)
    }

    pub fn history(&self) -> &SolutionHistory {
        &self.history
    }

    /// Produce the control plan for the horizon starting at `starttime`.
    ///
    /// Orchestrates estimate → forecast → (formulate once) → solve, and
    /// records the plan into the history. Any stage failing aborts the
    /// call; `formulate` is only marked done once it has succeeded.
    pub fn plan(&mut self, starttime: Real, trace: &Trace) -> ControlResult<Plan> {
        let state = self.estimator.estimate(starttime, trace)?;
        let prediction = self.predictor.forecast(&self.time_grid(starttime))?;

        if !self.formulated {
            self.planner.formulate()?;
            self.formulated = true;
        }

        let plan = self.planner.solve(&state, &prediction)?;
        self.history.record(&plan);
        Ok(plan)
    }
}
