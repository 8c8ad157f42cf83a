//! Extended/extrapolated disturbance series.
//!
//! A [`Disturbances`] value is built once from a recorded [`SignalRecord`]
//! and an extrapolation policy, and afterwards answers point queries for
//! any time in `[t0 - extra_time, t1 + extra_time]`.
//!
//! The extended axis is precomputed at construction: under `periodic` the
//! recorded cycle (with its final sample dropped) is appended, time-shifted
//! by the record span, as many times as `extra_time` needs; otherwise the
//! last recorded value is held. Cycles are half-open, so under `periodic`
//! the value at `t1` is the first sample's, not the last's.
//!
//! Queries below `t0` fold forward by whole spans (periodic) or clamp to
//! the first sample (non-periodic). Anything outside the declared window
//! is an error, never a silent clamp.

use std::collections::BTreeSet;

use mf_core::{Channel, Real, SignalRecord};
use serde::{Deserialize, Serialize};

use crate::error::{SeriesError, SeriesResult};
use crate::interp::Interp;

/// Extrapolation policy for a disturbance record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesOptions {
    /// Repeat the recorded cycle beyond its range instead of holding the
    /// boundary value.
    pub periodic: bool,
    /// Maximum time outside the recorded range that may be queried; must
    /// cover at least the control horizon.
    pub extra_time: Real,
    /// Keys interpolated with zero-order hold; all others are linear.
    pub zoh_keys: BTreeSet<String>,
}

impl Default for SeriesOptions {
    fn default() -> Self {
        Self {
            periodic: true,
            extra_time: 7.0 * 24.0 * 3600.0,
            zoh_keys: BTreeSet::new(),
        }
    }
}

/// An interpolated value at one instant: scalar or one row of a vector
/// signal.
#[derive(Debug, Clone, PartialEq)]
pub enum Sample {
    Scalar(Real),
    Vector(Vec<Real>),
}

impl Sample {
    pub fn as_scalar(&self) -> Option<Real> {
        match self {
            Sample::Scalar(v) => Some(*v),
            Sample::Vector(_) => None,
        }
    }
}

/// Immutable record of named exogenous signals, queryable beyond its
/// recorded range.
#[derive(Debug, Clone)]
pub struct Disturbances {
    ext: SignalRecord,
    zoh_keys: BTreeSet<String>,
    periodic: bool,
    extra_time: Real,
    t0: Real,
    t1: Real,
    span: Real,
}

impl Disturbances {
    /// Build the extended series from a recorded signal set.
    ///
    /// Fails on a record with fewer than two samples or a non-positive
    /// `extra_time`; malformed records (length mismatch, unsorted time)
    /// cannot exist as [`SignalRecord`] values in the first place.
    pub fn new(record: SignalRecord, options: SeriesOptions) -> SeriesResult<Self> {
        if record.len() < 2 {
            return Err(SeriesError::InvalidArg {
                what: "disturbance record needs at least two samples",
            });
        }
        if !(options.extra_time > 0.0) || !options.extra_time.is_finite() {
            return Err(SeriesError::InvalidArg {
                what: "extra_time must be positive and finite",
            });
        }

        let t0 = record.first_time();
        let t1 = record.last_time();
        let span = t1 - t0;
        let ext = if options.periodic {
            extend_periodic(&record, span, t1 + options.extra_time)?
        } else {
            extend_clamped(&record, t1 + options.extra_time)?
        };

        Ok(Self {
            ext,
            zoh_keys: options.zoh_keys,
            periodic: options.periodic,
            extra_time: options.extra_time,
            t0,
            t1,
            span,
        })
    }

    /// Interpolation kind declared for a key.
    pub fn kind(&self, key: &str) -> Interp {
        if self.zoh_keys.contains(key) {
            Interp::Zoh
        } else {
            Interp::Linear
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.ext.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.ext.keys()
    }

    /// First supported query time, `t0 - extra_time`.
    pub fn min_time(&self) -> Real {
        self.t0 - self.extra_time
    }

    /// Last supported query time, `t1 + extra_time`.
    pub fn max_time(&self) -> Real {
        self.t1 + self.extra_time
    }

    /// Span of the recorded range, `t1 - t0`.
    pub fn span(&self) -> Real {
        self.span
    }

    pub fn periodic(&self) -> bool {
        self.periodic
    }

    /// Interpolated value of one signal at one instant.
    pub fn value_at(&self, key: &str, time: Real) -> SeriesResult<Sample> {
        let channel = self.ext.channel(key).ok_or_else(|| SeriesError::UnknownKey {
            key: key.to_string(),
        })?;
        let kind = self.kind(key);
        let t = self.fold(time)?;
        match channel {
            Channel::Series(fp) => Ok(Sample::Scalar(kind.eval(t, self.ext.time(), fp))),
            Channel::Matrix(rows) => {
                let width = rows.first().map_or(0, Vec::len);
                let mut out = Vec::with_capacity(width);
                for j in 0..width {
                    let col: Vec<Real> = rows.iter().map(|r| r[j]).collect();
                    out.push(kind.eval(t, self.ext.time(), &col));
                }
                Ok(Sample::Vector(out))
            }
        }
    }

    /// Interpolated values of one signal over many instants, preserving
    /// the signal's rank.
    pub fn values_at(&self, key: &str, times: &[Real]) -> SeriesResult<Channel> {
        let channel = self.ext.channel(key).ok_or_else(|| SeriesError::UnknownKey {
            key: key.to_string(),
        })?;
        let kind = self.kind(key);
        let mut folded = Vec::with_capacity(times.len());
        for &time in times {
            folded.push(self.fold(time)?);
        }
        match channel {
            Channel::Series(fp) => {
                let values = folded
                    .iter()
                    .map(|&t| kind.eval(t, self.ext.time(), fp))
                    .collect();
                Ok(Channel::Series(values))
            }
            Channel::Matrix(rows) => {
                let width = rows.first().map_or(0, Vec::len);
                let mut cols = Vec::with_capacity(width);
                for j in 0..width {
                    let col: Vec<Real> = rows.iter().map(|r| r[j]).collect();
                    cols.push(
                        folded
                            .iter()
                            .map(|&t| kind.eval(t, self.ext.time(), &col))
                            .collect::<Vec<Real>>(),
                    );
                }
                let out = (0..times.len())
                    .map(|i| cols.iter().map(|c| c[i]).collect())
                    .collect();
                Ok(Channel::Matrix(out))
            }
        }
    }

    /// All signals interpolated onto a common axis.
    pub fn window(&self, times: &[Real]) -> SeriesResult<SignalRecord> {
        let mut record = SignalRecord::new(times.to_vec())?;
        let keys: Vec<String> = self.ext.keys().map(str::to_string).collect();
        for key in keys {
            let channel = self.values_at(&key, times)?;
            record.insert(key, channel)?;
        }
        Ok(record)
    }

    /// Map a query time into the precomputed extended axis, or reject it.
    fn fold(&self, time: Real) -> SeriesResult<Real> {
        let min = self.min_time();
        let max = self.max_time();
        let tol = 1e-9 * self.span.max(self.extra_time);
        if time < min - tol || time > max + tol {
            return Err(SeriesError::OutOfRange { time, min, max });
        }
        if time >= self.t0 {
            return Ok(time);
        }
        if self.periodic {
            let cycles = ((self.t0 - time) / self.span).ceil();
            Ok(time + cycles * self.span)
        } else {
            Ok(self.t0)
        }
    }
}

/// Extended axis for a periodic record: the recorded cycle minus its final
/// sample, then whole wrapped cycles until `limit` is covered.
fn extend_periodic(record: &SignalRecord, span: Real, limit: Real) -> SeriesResult<SignalRecord> {
    let base = record.time();
    let n = base.len();
    let mut time: Vec<Real> = base[..n - 1].to_vec();
    let mut picks: Vec<usize> = (0..n - 1).collect();

    'outer: for cycle in 1.. {
        let offset = cycle as Real * span;
        for i in 0..n - 1 {
            let t = base[i] + offset;
            time.push(t);
            picks.push(i);
            if t >= limit {
                break 'outer;
            }
        }
    }

    let mut ext = SignalRecord::new(time)?;
    for (key, channel) in record.iter() {
        let extended = match channel {
            Channel::Series(v) => Channel::Series(picks.iter().map(|&i| v[i]).collect()),
            Channel::Matrix(rows) => {
                Channel::Matrix(picks.iter().map(|&i| rows[i].clone()).collect())
            }
        };
        ext.insert(key, extended)?;
    }
    Ok(ext)
}

/// Extended axis for a clamped record: the full recording plus one held
/// sample at `limit`.
fn extend_clamped(record: &SignalRecord, limit: Real) -> SeriesResult<SignalRecord> {
    let mut time = record.time().to_vec();
    time.push(limit);

    let mut ext = SignalRecord::new(time)?;
    for (key, channel) in record.iter() {
        let extended = match channel {
            Channel::Series(v) => {
                let mut v = v.to_vec();
                v.push(v[v.len() - 1]);
                Channel::Series(v)
            }
            Channel::Matrix(rows) => {
                let mut rows = rows.to_vec();
                rows.push(rows[rows.len() - 1].clone());
                Channel::Matrix(rows)
            }
        };
        ext.insert(key, extended)?;
    }
    Ok(ext)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn periodic_round_trip(
            values in prop::collection::vec(-1000.0_f64..1000.0, 4..40),
            frac in 0.0_f64..1.0,
            cycles in 1_i32..3,
        ) {
            let n = values.len();
            let time: Vec<Real> = (0..n).map(|i| i as Real * 900.0).collect();
            let span = time[n - 1] - time[0];
            let record = SignalRecord::new(time).unwrap().with("y", values).unwrap();
            let opts = SeriesOptions {
                periodic: true,
                extra_time: 4.0 * span,
                zoh_keys: BTreeSet::new(),
            };
            let dst = Disturbances::new(record, opts).unwrap();

            let t = frac * span;
            let shifted = t + cycles as Real * span;
            let a = dst.value_at("y", t).unwrap().as_scalar().unwrap();
            let b = dst.value_at("y", shifted).unwrap().as_scalar().unwrap();
            prop_assert!((a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0));
        }
    }
}
