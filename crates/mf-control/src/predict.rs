//! Disturbance prediction seam.

use std::sync::Arc;

use mf_core::{Real, SignalRecord};
use mf_series::Disturbances;

use crate::error::ControlResult;

/// Forecasts exogenous signals over an arbitrary time grid.
///
/// Implementations must return the same keys on every call, with channels
/// aligned to the requested times; beyond that, how good the forecast is
/// (noise, bias, a model) is up to the implementation.
pub trait Predictor {
    fn forecast(&self, times: &[Real]) -> ControlResult<SignalRecord>;
}

/// Perfect foresight: the forecast is the disturbance record itself.
#[derive(Debug, Clone)]
pub struct PerfectForesight {
    disturbances: Arc<Disturbances>,
}

impl PerfectForesight {
    pub fn new(disturbances: Arc<Disturbances>) -> Self {
        Self { disturbances }
    }
}

impl Predictor for PerfectForesight {
    fn forecast(&self, times: &[Real]) -> ControlResult<SignalRecord> {
        Ok(self.disturbances.window(times)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_series::SeriesOptions;

    #[test]
    fn perfect_foresight_matches_the_record() {
        let record = SignalRecord::new(vec![0.0, 3600.0, 7200.0])
            .unwrap()
            .with("t_amb", vec![273.15, 274.15, 275.15])
            .unwrap();
        let dst = Arc::new(
            Disturbances::new(
                record,
                SeriesOptions {
                    periodic: false,
                    ..SeriesOptions::default()
                },
            )
            .unwrap(),
        );

        let forecast = PerfectForesight::new(Arc::clone(&dst))
            .forecast(&[0.0, 1800.0, 3600.0])
            .unwrap();
        assert_eq!(forecast.series("t_amb").unwrap(), &[273.15, 273.65, 274.15]);
        assert_eq!(
            forecast.series("t_amb").unwrap(),
            dst.window(&[0.0, 1800.0, 3600.0])
                .unwrap()
                .series("t_amb")
                .unwrap()
        );
    }
}
