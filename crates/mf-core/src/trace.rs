//! The append-only result trace grown by an emulation run.
//!
//! Consecutive simulation segments share their boundary instant: the last
//! sample of segment N and the first sample of segment N+1 are the same
//! time. Merging therefore drops the stored tail sample before appending,
//! on the time axis and on every merged channel, so the shared instant
//! appears exactly once and is never dropped entirely.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::numeric::{Real, Tolerances, nearly_equal, strictly_increasing};

/// A stored result signal.
///
/// `Constant` holds a value a backend reported once (a parameter echoed in
/// a segment as a single sample); it is stored as-is, not interpolated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TraceChannel {
    Series(Vec<Real>),
    Matrix(Vec<Vec<Real>>),
    Constant(Real),
}

/// A growing, append-only set of named arrays aligned to one time axis.
///
/// Only merged channels are touched by a merge; a channel seeded at a later
/// iteration starts at that iteration's samples. The time axis itself is
/// always strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    time: Vec<Real>,
    channels: BTreeMap<String, TraceChannel>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// A trace holding one sample per initial condition at time zero.
    pub fn seeded(initial_conditions: &BTreeMap<String, Real>) -> Self {
        let mut channels = BTreeMap::new();
        for (key, value) in initial_conditions {
            channels.insert(key.clone(), TraceChannel::Series(vec![*value]));
        }
        Self {
            time: vec![0.0],
            channels,
        }
    }

    pub fn time(&self) -> &[Real] {
        &self.time
    }

    pub fn last_time(&self) -> Option<Real> {
        self.time.last().copied()
    }

    /// Number of time points.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.channels.contains_key(key)
    }

    pub fn channel(&self, key: &str) -> Option<&TraceChannel> {
        self.channels.get(key)
    }

    /// Series view of a channel, `None` if absent or not a series.
    pub fn series(&self, key: &str) -> Option<&[Real]> {
        match self.channels.get(key) {
            Some(TraceChannel::Series(v)) => Some(v),
            _ => None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TraceChannel)> {
        self.channels.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Extend the time axis with a new segment.
    ///
    /// The segment must be strictly increasing and, unless the trace is
    /// still empty, start at the stored last time; that shared sample is
    /// dropped before appending.
    pub fn merge_time(&mut self, times: &[Real]) -> CoreResult<()> {
        if times.is_empty() {
            return Err(CoreError::InvalidArg {
                what: "segment time axis must not be empty",
            });
        }
        if let Err(index) = strictly_increasing(times) {
            return Err(CoreError::TimeNotIncreasing { index });
        }
        match self.time.last() {
            None => self.time.extend_from_slice(times),
            Some(&last) => {
                if !nearly_equal(last, times[0], Tolerances::default()) {
                    return Err(CoreError::Invariant {
                        what: "segment must start at the trace's last time",
                    });
                }
                self.time.pop();
                self.time.extend_from_slice(times);
            }
        }
        Ok(())
    }

    /// Merge samples for one channel, aligned to the times most recently
    /// passed to [`merge_time`](Self::merge_time).
    ///
    /// An existing series loses its tail sample before the new samples are
    /// appended; an existing constant is replaced outright.
    pub fn merge_series(&mut self, key: &str, values: &[Real]) -> CoreResult<()> {
        match self.channels.get_mut(key) {
            None => {
                self.channels
                    .insert(key.to_string(), TraceChannel::Series(values.to_vec()));
            }
            Some(TraceChannel::Series(stored)) => {
                stored.pop();
                stored.extend_from_slice(values);
            }
            Some(slot @ TraceChannel::Constant(_)) => {
                *slot = TraceChannel::Series(values.to_vec());
            }
            Some(TraceChannel::Matrix(_)) => {
                return Err(CoreError::Invariant {
                    what: "cannot merge scalar samples into a matrix channel",
                });
            }
        }
        Ok(())
    }

    /// Store a single-sample channel as-is.
    pub fn set_constant(&mut self, key: &str, value: Real) {
        self.channels
            .insert(key.to_string(), TraceChannel::Constant(value));
    }

    /// Replace a channel wholesale (used when exogenous signals are folded
    /// into a finished trace over its full time axis).
    pub fn overwrite(&mut self, key: &str, channel: TraceChannel) {
        self.channels.insert(key.to_string(), channel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_trace_starts_at_zero() {
        let ics = BTreeMap::from([("x".to_string(), 295.15)]);
        let trace = Trace::seeded(&ics);
        assert_eq!(trace.time(), &[0.0]);
        assert_eq!(trace.series("x").unwrap(), &[295.15]);
    }

    #[test]
    fn merge_deduplicates_shared_instant() {
        let mut trace = Trace::new();
        trace.merge_time(&[0.0, 5.0, 10.0]).unwrap();
        trace.merge_series("x", &[1.0, 2.0, 3.0]).unwrap();

        trace.merge_time(&[10.0, 15.0, 20.0]).unwrap();
        trace.merge_series("x", &[3.5, 4.0, 5.0]).unwrap();

        assert_eq!(trace.time(), &[0.0, 5.0, 10.0, 15.0, 20.0]);
        // The re-simulated boundary sample wins.
        assert_eq!(trace.series("x").unwrap(), &[1.0, 2.0, 3.5, 4.0, 5.0]);
    }

    #[test]
    fn merge_rejects_gap() {
        let mut trace = Trace::new();
        trace.merge_time(&[0.0, 10.0]).unwrap();
        let err = trace.merge_time(&[20.0, 30.0]).unwrap_err();
        assert!(matches!(err, CoreError::Invariant { .. }));
    }

    #[test]
    fn merge_rejects_unsorted_segment() {
        let mut trace = Trace::new();
        let err = trace.merge_time(&[0.0, 10.0, 10.0]).unwrap_err();
        assert_eq!(err, CoreError::TimeNotIncreasing { index: 2 });
    }

    #[test]
    fn constant_then_series() {
        let mut trace = Trace::new();
        trace.merge_time(&[0.0, 1.0]).unwrap();
        trace.set_constant("cap", 10e6);
        assert_eq!(trace.channel("cap"), Some(&TraceChannel::Constant(10e6)));

        trace.merge_time(&[1.0, 2.0]).unwrap();
        trace.merge_series("cap", &[9e6, 8e6]).unwrap();
        assert_eq!(trace.series("cap").unwrap(), &[9e6, 8e6]);
    }

    #[test]
    fn late_seeded_channel_keeps_only_new_samples() {
        let mut trace = Trace::new();
        trace.merge_time(&[0.0, 1.0]).unwrap();
        trace.merge_time(&[1.0, 2.0]).unwrap();
        trace.merge_series("y", &[7.0, 8.0]).unwrap();
        assert_eq!(trace.series("y").unwrap(), &[7.0, 8.0]);
        assert_eq!(trace.len(), 3);
    }
}
