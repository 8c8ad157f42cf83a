//! Horizon configuration for a receding-horizon controller.

use mf_core::{Real, arange};
use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Look-ahead window of a controller: total horizon length, grid spacing
/// within the horizon, and the real-time advance per loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonConfig {
    /// Total look-ahead length.
    pub horizon: Real,
    /// Grid spacing within the horizon.
    pub timestep: Real,
    /// Real-time advance per receding step; defaults to `timestep`.
    pub receding: Real,
}

impl HorizonConfig {
    /// Create a horizon configuration with `receding == timestep`.
    ///
    /// # Arguments
    ///
    /// * `horizon` - Total look-ahead length (must be positive)
    /// * `timestep` - Grid spacing (must be positive)
    pub fn new(horizon: Real, timestep: Real) -> ControlResult<Self> {
        if !(horizon > 0.0) || !horizon.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "horizon must be positive",
            });
        }
        if !(timestep > 0.0) || !timestep.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "timestep must be positive",
            });
        }
        Ok(Self {
            horizon,
            timestep,
            receding: timestep,
        })
    }

    /// Override the receding interval.
    pub fn with_receding(mut self, receding: Real) -> ControlResult<Self> {
        if !(receding > 0.0) || !receding.is_finite() {
            return Err(ControlError::InvalidArg {
                what: "receding must be positive",
            });
        }
        self.receding = receding;
        Ok(self)
    }

    /// The horizon grid starting at `starttime`: `starttime` through
    /// `starttime + horizon` inclusive, spaced by `timestep`.
    ///
    /// The endpoint is captured by padding the open bound with
    /// `0.01 * timestep`, which keeps it included under accumulated
    /// floating-point error without ever picking up an extra step.
    pub fn time_grid(&self, starttime: Real) -> Vec<Real> {
        arange(
            starttime,
            starttime + self.horizon + 0.01 * self.timestep,
            self.timestep,
        )
    }
}
