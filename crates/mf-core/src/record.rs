//! Named signal channels aligned to a shared time axis.
//!
//! A [`SignalRecord`] is the interchange type between the engine's
//! collaborators: disturbance records, forecasts, control plans and
//! simulation inputs/segments all travel as one. Every channel is checked
//! against the record's time axis on insertion, so a record that exists is
//! a record whose arrays line up.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::numeric::{Real, strictly_increasing};

/// A single named signal: one value per time point (`Series`) or one row of
/// values per time point (`Matrix`, rectangular).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Channel {
    Series(Vec<Real>),
    Matrix(Vec<Vec<Real>>),
}

impl Channel {
    /// Number of time points covered by this channel.
    pub fn len(&self) -> usize {
        match self {
            Channel::Series(v) => v.len(),
            Channel::Matrix(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column count for a matrix channel, `None` for a series.
    pub fn width(&self) -> Option<usize> {
        match self {
            Channel::Series(_) => None,
            Channel::Matrix(rows) => Some(rows.first().map_or(0, Vec::len)),
        }
    }

    pub fn as_series(&self) -> Option<&[Real]> {
        match self {
            Channel::Series(v) => Some(v),
            Channel::Matrix(_) => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&[Vec<Real>]> {
        match self {
            Channel::Series(_) => None,
            Channel::Matrix(rows) => Some(rows),
        }
    }
}

impl From<Vec<Real>> for Channel {
    fn from(values: Vec<Real>) -> Self {
        Channel::Series(values)
    }
}

impl From<Vec<Vec<Real>>> for Channel {
    fn from(rows: Vec<Vec<Real>>) -> Self {
        Channel::Matrix(rows)
    }
}

/// Named signals over one strictly increasing time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    time: Vec<Real>,
    channels: BTreeMap<String, Channel>,
}

impl SignalRecord {
    /// Create a record with the given time axis and no channels yet.
    ///
    /// Fails if the axis is empty or not strictly increasing.
    pub fn new(time: Vec<Real>) -> CoreResult<Self> {
        if time.is_empty() {
            return Err(CoreError::InvalidArg {
                what: "time axis must not be empty",
            });
        }
        if let Err(index) = strictly_increasing(&time) {
            return Err(CoreError::TimeNotIncreasing { index });
        }
        Ok(Self {
            time,
            channels: BTreeMap::new(),
        })
    }

    /// Insert a channel, checking it covers exactly the time axis.
    pub fn insert(&mut self, key: impl Into<String>, channel: impl Into<Channel>) -> CoreResult<()> {
        let key = key.into();
        let channel = channel.into();
        if channel.len() != self.time.len() {
            return Err(CoreError::LengthMismatch {
                key,
                expected: self.time.len(),
                actual: channel.len(),
            });
        }
        if let Channel::Matrix(rows) = &channel {
            let expected = rows.first().map_or(0, Vec::len);
            for (row, values) in rows.iter().enumerate() {
                if values.len() != expected {
                    return Err(CoreError::RaggedMatrix {
                        key,
                        row,
                        expected,
                        actual: values.len(),
                    });
                }
            }
        }
        self.channels.insert(key, channel);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, channel: impl Into<Channel>) -> CoreResult<Self> {
        self.insert(key, channel)?;
        Ok(self)
    }

    pub fn time(&self) -> &[Real] {
        &self.time
    }

    pub fn first_time(&self) -> Real {
        self.time[0]
    }

    pub fn last_time(&self) -> Real {
        self.time[self.time.len() - 1]
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

    pub fn channel(&self, key: &str) -> Option<&Channel> {
        self.channels.get(key)
    }

    /// Series view of a channel, `None` if absent or a matrix.
    pub fn series(&self, key: &str) -> Option<&[Real]> {
        self.channels.get(key).and_then(Channel::as_series)
    }

    /// Channel names, time excluded, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Channel)> {
        self.channels.iter().map(|(k, v)| (k.as_str(), v))
    }
}
