//! End-to-end controller behaviour against the simulated device.
//!
//! Connection, notification, loss, reconnect and user-driven mode changes,
//! all through the same runtime the terminal frontend uses.

use drumlights_app::{AppEvent, ControlId, Layout};
use drumlights_harness::{
    StepKind,
    scenario::{Scenario, oracle},
};
use drumlights_proto::ModeId;

fn control(mode: i32) -> ControlId {
    Layout::drum_lights().unwrap().controls_for_mode(ModeId::new(mode))[0]
}

#[tokio::test]
async fn open_notify_close_reconnect_off() {
    let layout = Layout::drum_lights().unwrap();
    let solid = layout.find_tab("Solid");

    let result = Scenario::new("end to end")
        .device_mode(2)
        .checkpoint(100, "opened")
        .step(1000, StepKind::DropLink)
        .checkpoint(1500, "closed")
        .step(1800, StepKind::DeviceMode(ModeId::new(0)))
        .checkpoint(2500, "reconnected")
        .quit_at(3000)
        .oracle(oracle::all_of(vec![
            oracle::exclusive_highlights(),
            oracle::check(move |world| {
                let opened = world.observation("opened")?;
                assert!(!opened.overlay_visible);
                assert_eq!(opened.active_controls, vec![control(2)]);
                assert_eq!(opened.active_tab, solid);

                let closed = world.observation("closed")?;
                assert!(closed.overlay_visible);
                assert_eq!(closed.active_controls, vec![control(2)]);
                assert_eq!(closed.active_tab, solid);

                let reconnected = world.observation("reconnected")?;
                assert!(!reconnected.overlay_visible);
                assert!(reconnected.active_controls.is_empty());
                assert_eq!(reconnected.active_tab, None);
                assert_eq!(reconnected.device_mode, Some(ModeId::OFF));
                Ok(())
            }),
        ]))
        .run()
        .await;

    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn user_selection_round_trips_through_device() {
    let chase = Layout::drum_lights().unwrap().find_tab("Chase");

    let result = Scenario::new("user selection")
        .input(200, AppEvent::ControlActivated(control(12)))
        .checkpoint(300, "chase green")
        .input(400, AppEvent::ControlActivated(control(98)))
        .checkpoint(500, "after strobe")
        .quit_at(1000)
        .oracle(oracle::all_of(vec![
            oracle::sent_modes(vec![12, 98]),
            oracle::check(move |world| {
                let chosen = world.observation("chase green")?;
                assert_eq!(chosen.active_controls, vec![control(12)]);
                assert_eq!(chosen.active_tab, chase);

                // strobe is one-shot: the device announces the previous mode
                let strobe = world.observation("after strobe")?;
                assert_eq!(strobe.active_controls, vec![control(12)]);
                Ok(())
            }),
        ]))
        .run()
        .await;

    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn input_while_disconnected_is_ignored() {
    let result = Scenario::new("offline input")
        .device_offline()
        .input(200, AppEvent::ControlActivated(control(5)))
        .step(300, StepKind::DeviceOnline(true))
        .checkpoint(1500, "online")
        .quit_at(2000)
        .oracle(oracle::all_of(vec![
            oracle::sent_modes(vec![]),
            oracle::ends_connected(),
            oracle::check(|world| {
                let online = world.observation("online")?;
                assert!(!online.overlay_visible);
                assert!(online.active_controls.is_empty());
                Ok(())
            }),
        ]))
        .run()
        .await;

    assert!(result.is_ok(), "{result:?}");
}

#[tokio::test]
async fn changes_from_elsewhere_are_mirrored() {
    let special = Layout::drum_lights().unwrap().find_tab("Special");

    let result = Scenario::new("other client")
        .step(500, StepKind::DeviceMode(ModeId::new(97)))
        .checkpoint(600, "hazards")
        .step(700, StepKind::DeviceMode(ModeId::new(4242)))
        .checkpoint(800, "unknown")
        .quit_at(1000)
        .oracle(oracle::check(move |world| {
            let hazards = world.observation("hazards")?;
            let expected: Vec<_> = world.control_for(97).into_iter().collect();
            assert_eq!(hazards.active_controls, expected);
            assert_eq!(hazards.active_tab, special);

            let unknown = world.observation("unknown")?;
            assert!(unknown.active_controls.is_empty());
            assert_eq!(unknown.active_tab, special);
            Ok(())
        }))
        .run()
        .await;

    assert!(result.is_ok(), "{result:?}");
}
