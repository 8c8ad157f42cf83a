//! Emulator: result-trace accumulation around an opaque simulation
//! backend.

use std::collections::BTreeMap;

use mf_core::{Channel, Real, SignalRecord, Trace};
use mf_series::Interp;
use tracing::warn;

use crate::error::{SimError, SimResult};

/// The delegated simulation step.
///
/// `advance` must return a segment covering `[start_time, stop_time]` on
/// its own time axis, holding at least the backend's internal state keys;
/// inputs the backend does not echo are carried over from the input trace
/// by the [`Emulator`]. A raised error is fatal to the surrounding run.
pub trait Backend {
    fn advance(
        &mut self,
        start_time: Real,
        stop_time: Real,
        input: &SignalRecord,
    ) -> SimResult<SignalRecord>;
}

/// Wraps a [`Backend`] and grows the single continuous result trace.
pub struct Emulator<B> {
    backend: B,
    input_keys: Vec<String>,
    initial_conditions: BTreeMap<String, Real>,
    trace: Trace,
    initialized: bool,
}

impl<B: Backend> Emulator<B> {
    /// Create an emulator declaring which input signals the backend
    /// consumes. Only declared inputs are interpolated and passed along by
    /// the run loop.
    pub fn new(backend: B, input_keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            backend,
            input_keys: input_keys.into_iter().map(Into::into).collect(),
            initial_conditions: BTreeMap::new(),
            trace: Trace::new(),
            initialized: false,
        }
    }

    /// Declare initial conditions seeded into the trace at time zero.
    pub fn with_initial_conditions(
        mut self,
        initial: impl IntoIterator<Item = (impl Into<String>, Real)>,
    ) -> Self {
        for (key, value) in initial {
            self.initial_conditions.insert(key.into(), value);
        }
        self
    }

    /// Declare initial conditions from the tail samples of a record (the
    /// end state of a previous run, for instance).
    pub fn with_initial_conditions_from(mut self, record: &SignalRecord) -> Self {
        for (key, channel) in record.iter() {
            if let Channel::Series(values) = channel
                && let Some(&last) = values.last()
            {
                self.initial_conditions.insert(key.to_string(), last);
            }
        }
        self
    }

    pub fn input_keys(&self) -> &[String] {
        &self.input_keys
    }

    /// The accumulated result trace.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub(crate) fn trace_mut(&mut self) -> &mut Trace {
        &mut self.trace
    }

    /// Reset the trace to its starting condition: time zero plus one
    /// sample per declared initial condition. Must run once before the
    /// first [`step`](Self::step) of a fresh run.
    pub fn initialize(&mut self) {
        self.trace = Trace::seeded(&self.initial_conditions);
        self.initialized = true;
    }

    /// Simulate one segment and merge it into the trace.
    ///
    /// `times` is the axis the results are wanted on; `input` may carry a
    /// finer axis (control switching instants). The backend segment and
    /// any inputs it does not echo are interpolated onto `times` and
    /// merged under the shared-boundary dedup rule; single-sample segment
    /// channels are stored as constants, as-is.
    pub fn step(&mut self, times: &[Real], input: &SignalRecord) -> SimResult<()> {
        if !self.initialized {
            return Err(SimError::InvalidArg {
                what: "emulator must be initialized before stepping",
            });
        }
        if times.is_empty() {
            return Err(SimError::InvalidArg {
                what: "requested time axis must not be empty",
            });
        }

        let segment = self
            .backend
            .advance(times[0], times[times.len() - 1], input)?;

        self.trace.merge_time(times)?;

        // Inputs the backend did not echo back (passthrough signals).
        for (key, channel) in input.iter() {
            if segment.contains_key(key) {
                continue;
            }
            self.merge_channel(key, times, input.time(), channel)?;
        }

        // The simulated segment itself, on its own axis.
        for (key, channel) in segment.iter() {
            self.merge_channel(key, times, segment.time(), channel)?;
        }

        Ok(())
    }

    fn merge_channel(
        &mut self,
        key: &str,
        times: &[Real],
        axis: &[Real],
        channel: &Channel,
    ) -> SimResult<()> {
        let Channel::Series(values) = channel else {
            warn!(%key, "vector channels are not merged into the result trace");
            return Ok(());
        };
        if values.len() == 1 {
            self.trace.set_constant(key, values[0]);
            return Ok(());
        }
        let resampled = Interp::Linear.eval_slice(times, axis, values);
        self.trace.merge_series(key, &resampled)?;
        Ok(())
    }
}
