//! Reusable oracles.

use std::{collections::HashSet, time::Duration};

use crate::scenario::{OracleFn, World};

/// Pass only if every oracle passes. Stops at the first failure.
pub fn all_of(oracles: Vec<OracleFn>) -> OracleFn {
    Box::new(move |world| oracles.iter().try_for_each(|oracle| oracle(world)))
}

/// No checkpoint saw two active controls in one grouping.
pub fn exclusive_highlights() -> OracleFn {
    Box::new(|world| {
        for observation in world.driver().observations() {
            let mut groups = HashSet::new();
            for &id in &observation.active_controls {
                let control = world
                    .layout()
                    .control(id)
                    .ok_or_else(|| format!("{}: unknown control {id:?}", observation.label))?;
                if !groups.insert(control.group) {
                    return Err(format!("{}: two active controls in one group", observation.label));
                }
            }
        }
        Ok(())
    })
}

/// The run ended connected, with the overlay hidden.
pub fn ends_connected() -> OracleFn {
    Box::new(|world| {
        if world.app().overlay_visible() {
            return Err("overlay still visible".into());
        }
        Ok(())
    })
}

/// The device received exactly these modes, in order.
pub fn sent_modes(expected: Vec<i32>) -> OracleFn {
    Box::new(move |world| {
        let sent = world.sent_modes();
        if sent != expected {
            return Err(format!("sent {sent:?}, expected {expected:?}"));
        }
        Ok(())
    })
}

/// Connection attempts were never closer together than `delay`.
pub fn attempts_spaced_by(delay: Duration) -> OracleFn {
    Box::new(move |world| {
        for pair in world.driver().connect_log().windows(2) {
            if pair[1] - pair[0] < delay {
                return Err(format!("attempts at {:?} and {:?}", pair[0], pair[1]));
            }
        }
        Ok(())
    })
}

/// Box a closure as an oracle.
pub fn check(f: impl Fn(&World) -> Result<(), String> + 'static) -> OracleFn {
    Box::new(f)
}
