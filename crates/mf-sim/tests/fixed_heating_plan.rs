//! Integration test: fixed heating plan over a short solar record.
//!
//! A disturbance record of three hourly samples, a controller whose plan
//! is a constant heat-pump power, and a pass-through backend. After the
//! run the trace must carry the control and the disturbance on the same
//! three-sample axis, each appearing exactly once.

use std::collections::BTreeSet;
use std::sync::Arc;

use mf_control::{
    Control, ControlResult, HorizonConfig, NoEstimator, PerfectForesight, Plan, Planner,
};
use mf_core::{SignalRecord, Trace};
use mf_series::{Disturbances, SeriesOptions};
use mf_sim::{Backend, Emulator, Mpc, MpcOptions, SimResult};

struct PassThrough;

impl Backend for PassThrough {
    fn advance(
        &mut self,
        _start_time: f64,
        _stop_time: f64,
        input: &SignalRecord,
    ) -> SimResult<SignalRecord> {
        Ok(input.clone())
    }
}

struct HeatPumpPlanner;

impl Planner for HeatPumpPlanner {
    type State = ();

    fn solve(&mut self, _state: &(), _prediction: &SignalRecord) -> ControlResult<Plan> {
        Ok(SignalRecord::new(vec![0.0, 3600.0, 7200.0])
            .unwrap()
            .with("u", vec![4000.0, 4000.0, 4000.0])
            .unwrap())
    }
}

#[test]
fn trace_aligns_control_and_disturbance() {
    let record = SignalRecord::new(vec![0.0, 3600.0, 7200.0])
        .unwrap()
        .with("d", vec![500.0, 400.0, 300.0])
        .unwrap();
    let dst = Arc::new(
        Disturbances::new(
            record,
            SeriesOptions {
                periodic: false,
                extra_time: 7.0 * 24.0 * 3600.0,
                zoh_keys: BTreeSet::new(),
            },
        )
        .unwrap(),
    );

    let config = HorizonConfig::new(7200.0, 3600.0).unwrap();
    let control = Control::new(
        NoEstimator,
        PerfectForesight::new(Arc::clone(&dst)),
        HeatPumpPlanner,
        config,
    );
    let emulator = Emulator::new(PassThrough, ["u", "d"]);
    let options = MpcOptions::new(7200.0, 3600.0).unwrap();

    let mut mpc = Mpc::new(emulator, control, dst, options).unwrap();
    let trace = mpc.run().unwrap();

    assert_eq!(trace.time(), &[0.0, 3600.0, 7200.0]);
    assert_eq!(trace.series("u").unwrap(), &[4000.0, 4000.0, 4000.0]);
    assert_eq!(trace.series("d").unwrap(), &[500.0, 400.0, 300.0]);
}

#[test]
fn finished_trace_survives_serde() {
    let record = SignalRecord::new(vec![0.0, 3600.0, 7200.0])
        .unwrap()
        .with("d", vec![500.0, 400.0, 300.0])
        .unwrap();
    let dst = Arc::new(
        Disturbances::new(
            record,
            SeriesOptions {
                periodic: false,
                extra_time: 7.0 * 24.0 * 3600.0,
                zoh_keys: BTreeSet::new(),
            },
        )
        .unwrap(),
    );

    let config = HorizonConfig::new(7200.0, 3600.0).unwrap();
    let control = Control::new(
        NoEstimator,
        PerfectForesight::new(Arc::clone(&dst)),
        HeatPumpPlanner,
        config,
    );
    let emulator = Emulator::new(PassThrough, ["u", "d"]);
    let options = MpcOptions::new(7200.0, 3600.0).unwrap();

    let mut mpc = Mpc::new(emulator, control, dst, options).unwrap();
    let trace = mpc.run().unwrap();

    let json = serde_json::to_string(&trace).unwrap();
    let back: Trace = serde_json::from_str(&json).unwrap();
    assert_eq!(back, trace);
}
