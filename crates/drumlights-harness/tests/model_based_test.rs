//! Model-based property tests.
//!
//! Random scripts of link drops, device outages and device-side mode changes
//! run through the production runtime. A reference model tracks the only
//! thing that matters at the end: the mode the device is running.
//!
//! ```text
//! proptest generates: Vec<Op>
//!                        │
//!           ┌────────────┼────────────┐
//!           ▼            ▼            ▼
//!      DeviceModel   Scenario      Compare
//!      (reference)   (SimDriver)   final state
//! ```

use drumlights_app::ControlId;
use drumlights_core::{ConnectionConfig, ConnectionState};
use drumlights_harness::{
    StepKind,
    scenario::{Scenario, World, oracle},
};
use drumlights_proto::ModeId;
use proptest::prelude::*;

/// Modes a device-side change may pick. Excludes auto and strobe, whose
/// outcome the model would have to predict.
const MODES: [i32; 7] = [0, 2, 12, 93, 97, 199, 4242];

#[derive(Debug, Clone)]
enum Op {
    DropLink,
    DeviceOnline(bool),
    DeviceMode(i32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::DropLink),
        2 => any::<bool>().prop_map(Op::DeviceOnline),
        4 => prop::sample::select(MODES.to_vec()).prop_map(Op::DeviceMode),
    ]
}

/// Reference model: the device's mode, whatever the link does.
struct DeviceModel {
    mode: i32,
}

impl DeviceModel {
    fn apply(&mut self, op: &Op) {
        if let Op::DeviceMode(mode) = op {
            self.mode = *mode;
        }
    }

    /// Controls the App should show once it has heard from the device.
    fn expected_controls(&self, world: &World) -> Vec<ControlId> {
        if self.mode == 0 {
            return vec![];
        }
        world.control_for(self.mode).into_iter().collect()
    }
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(future)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever happened to the link, once it is back the App mirrors the
    /// device and never showed two highlights in one grouping.
    #[test]
    fn prop_app_converges_to_device_mode(
        seed in any::<u64>(),
        start in prop::sample::select(MODES.to_vec()),
        ops in prop::collection::vec((op_strategy(), 1..700u64), 0..30),
    ) {
        let delay = ConnectionConfig::default().reconnect_delay;
        let mut model = DeviceModel { mode: start };

        let mut scenario = Scenario::new("model").seed(seed).device_mode(start);
        let mut at = 0;
        for (i, (op, gap)) in ops.iter().enumerate() {
            at += gap;
            model.apply(op);
            let kind = match op {
                Op::DropLink => StepKind::DropLink,
                Op::DeviceOnline(online) => StepKind::DeviceOnline(*online),
                Op::DeviceMode(mode) => StepKind::DeviceMode(ModeId::new(*mode)),
            };
            scenario = scenario.step(at, kind).checkpoint(at, format!("op {i}"));
        }
        let settle = at + 1;
        let end = settle + delay.as_millis() as u64 * 2;

        let result = block_on(
            scenario
                .step(settle, StepKind::DeviceOnline(true))
                .quit_at(end)
                .oracle(oracle::all_of(vec![
                    oracle::exclusive_highlights(),
                    oracle::attempts_spaced_by(delay),
                    oracle::ends_connected(),
                    oracle::check(move |world| {
                        if world.connection().state() != ConnectionState::Connected {
                            return Err(format!("ended {:?}", world.connection().state()));
                        }
                        let device_mode = world.app().device_mode();
                        if device_mode != Some(ModeId::new(model.mode)) {
                            let device = model.mode;
                            return Err(format!("app saw {device_mode:?}, device runs {device}"));
                        }
                        let active: Vec<_> = world.app().highlights().active_controls().collect();
                        let expected = model.expected_controls(world);
                        if active != expected {
                            return Err(format!("active {active:?}, expected {expected:?}"));
                        }
                        Ok(())
                    }),
                ]))
                .run(),
        );

        prop_assert!(result.is_ok(), "{:?}", result);
    }
}
