//! The receding-horizon loop.
//!
//! Each iteration solves a plan for the current clock, stitches the plan's
//! near-term portion onto the disturbance forecast, simulates the window,
//! and advances the clock to the last actually-simulated time. Control
//! switching instants are realized exactly by splicing each plan
//! breakpoint, shifted back by a negligible epsilon, into the simulation
//! input axis: the zero-order-hold step then survives the linear
//! resampling inside the emulator.

use std::sync::Arc;

use mf_control::{Control, Plan, Planner, Predictor, StateEstimator};
use mf_core::{Channel, Real, SignalRecord, Trace, TraceChannel, arange};
use mf_series::{Disturbances, Interp};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::emulator::{Backend, Emulator};
use crate::error::{SimError, SimResult};
use crate::step::{SingleStep, StepPolicy};

/// Run-level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MpcOptions {
    /// Total emulated time.
    pub emulation_time: Real,
    /// Spacing of the reported result grid.
    pub result_timestep: Real,
    /// Emit progress events while running.
    pub progress: bool,
}

impl MpcOptions {
    pub fn new(emulation_time: Real, result_timestep: Real) -> SimResult<Self> {
        if !(emulation_time > 0.0) || !emulation_time.is_finite() {
            return Err(SimError::InvalidArg {
                what: "emulation_time must be positive",
            });
        }
        if !(result_timestep > 0.0) || !result_timestep.is_finite() {
            return Err(SimError::InvalidArg {
                what: "result_timestep must be positive",
            });
        }
        Ok(Self {
            emulation_time,
            result_timestep,
            progress: false,
        })
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }
}

/// The receding-horizon coordinator.
///
/// Owns the emulator (and through it the result trace), the controller,
/// and the shared disturbance record. A failed run leaves the partial
/// trace in place, reachable through [`trace`](Self::trace).
pub struct Mpc<B, E, P, L> {
    emulator: Emulator<B>,
    control: Control<E, P, L>,
    disturbances: Arc<Disturbances>,
    options: MpcOptions,
    step_policy: Box<dyn StepPolicy>,
    live_view: Option<Box<dyn FnMut(&Trace)>>,
}

impl<B, E, P, L> std::fmt::Debug for Mpc<B, E, P, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mpc")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<B, E, P, L> Mpc<B, E, P, L>
where
    B: Backend,
    E: StateEstimator,
    P: Predictor,
    L: Planner<State = E::State>,
{
    /// Wire up a run.
    ///
    /// Fails if `result_timestep` exceeds the controller's receding
    /// interval: a result grid coarser than one receding step could not
    /// advance the clock and the loop would stall.
    pub fn new(
        emulator: Emulator<B>,
        control: Control<E, P, L>,
        disturbances: Arc<Disturbances>,
        options: MpcOptions,
    ) -> SimResult<Self> {
        if options.result_timestep > control.receding() {
            return Err(SimError::InvalidArg {
                what: "result_timestep must not exceed the receding interval",
            });
        }
        Ok(Self {
            emulator,
            control,
            disturbances,
            options,
            step_policy: Box::new(SingleStep),
            live_view: None,
        })
    }

    /// Replace the default one-interval-per-iteration step policy.
    pub fn with_step_policy(mut self, policy: impl StepPolicy + 'static) -> Self {
        self.step_policy = Box::new(policy);
        self
    }

    /// Install a hook receiving the trace after every merged iteration.
    pub fn with_live_view(mut self, hook: impl FnMut(&Trace) + 'static) -> Self {
        self.live_view = Some(Box::new(hook));
        self
    }

    pub fn options(&self) -> &MpcOptions {
        &self.options
    }

    pub fn emulator(&self) -> &Emulator<B> {
        &self.emulator
    }

    pub fn control(&self) -> &Control<E, P, L> {
        &self.control
    }

    /// The result trace accumulated so far (partial after an aborted run).
    pub fn trace(&self) -> &Trace {
        self.emulator.trace()
    }

    /// Run the full receding-horizon emulation and return the final
    /// trace, with the disturbances folded in over its complete axis.
    pub fn run(&mut self) -> SimResult<Trace> {
        self.emulator.initialize();
        let mut starttime: Real = 0.0;

        while starttime < self.options.emulation_time {
            let plan = self.control.plan(starttime, self.emulator.trace())?;

            let multiplier = self.step_policy.next_step(&plan).max(1);
            let times = self.result_grid(starttime, multiplier);
            let input = self.build_input(&times, &plan)?;

            self.emulator.step(&times, &input)?;

            // The clock reflects actually-simulated time, not requested time.
            starttime = self
                .emulator
                .trace()
                .last_time()
                .unwrap_or(self.options.emulation_time);

            if let Some(hook) = self.live_view.as_mut() {
                hook(self.emulator.trace());
            }
            if self.options.progress {
                info!(
                    completed = starttime / self.options.emulation_time,
                    starttime, "mpc iteration merged"
                );
            }
        }

        // Fold the exogenous signals into the finished trace so simulated
        // and disturbance channels share one axis.
        let axis = self.emulator.trace().time().to_vec();
        let window = self.disturbances.window(&axis)?;
        for (key, channel) in window.iter() {
            let stored = match channel {
                Channel::Series(values) => TraceChannel::Series(values.clone()),
                Channel::Matrix(rows) => TraceChannel::Matrix(rows.clone()),
            };
            self.emulator.trace_mut().overwrite(key, stored);
        }

        Ok(self.emulator.trace().clone())
    }

    /// The result grid for one iteration: `starttime` up to at most
    /// `multiplier` receding intervals ahead, clamped to the emulation
    /// end.
    ///
    /// The open bound is padded by `0.01 * result_timestep` so the
    /// interval endpoint survives floating-point accumulation; the final
    /// point is then clamped to `emulation_time` exactly.
    fn result_grid(&self, starttime: Real, multiplier: usize) -> Vec<Real> {
        let rts = self.options.result_timestep;
        let stop = (self.options.emulation_time + rts)
            .min(starttime + multiplier as Real * self.control.receding() + 0.01 * rts);
        let mut times = arange(starttime, stop, rts);
        if let Some(last) = times.last_mut() {
            *last = last.min(self.options.emulation_time);
        }
        times
    }

    /// Assemble the simulation input for one window.
    ///
    /// Plan breakpoints inside the window are spliced into the axis at
    /// `t - 1e-6 * result_timestep`; plan signals are sampled with
    /// zero-order hold, remaining declared inputs with their disturbance
    /// kind. A declared input found in neither source is reported and
    /// omitted.
    fn build_input(&self, times: &[Real], plan: &Plan) -> SimResult<SignalRecord> {
        let eps = 1e-6 * self.options.result_timestep;
        let lo = times[0];
        let hi = times[times.len() - 1];

        let mut axis = times.to_vec();
        for &t in plan.time() {
            let shifted = t - eps;
            if shifted > lo && shifted <= hi {
                axis.push(shifted);
            }
        }
        axis.sort_by(Real::total_cmp);
        axis.dedup();

        let mut input = SignalRecord::new(axis.clone())?;

        for (key, channel) in plan.iter() {
            let Channel::Series(values) = channel else {
                warn!(%key, "vector plan channels are not supported as inputs");
                continue;
            };
            input.insert(key, Interp::Zoh.eval_slice(&axis, plan.time(), values))?;
        }

        for key in self.emulator.input_keys() {
            if input.contains_key(key) {
                continue;
            }
            if self.disturbances.contains_key(key) {
                let channel = self.disturbances.values_at(key, &axis)?;
                input.insert(key.clone(), channel)?;
            } else {
                warn!(%key, "declared input missing from both the control plan and the disturbances");
            }
        }

        Ok(input)
    }
}
