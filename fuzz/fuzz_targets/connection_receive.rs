#![no_main]

use std::time::Instant;

use drumlights_core::{Connection, ConnectionAction, ConnectionConfig, ConnectionState, Endpoint};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let now = Instant::now();

    let mut conn = Connection::new(Endpoint::from_url("ws://fuzz/ws"), ConnectionConfig::default());
    conn.connect(now);
    let _ = conn.transport_opened(now);

    // arbitrary frames never change the connection state
    let actions = conn.receive(&text);
    assert!(actions.len() <= 1);
    assert!(actions.iter().all(|a| matches!(a, ConnectionAction::Emit(_))));
    assert_eq!(conn.state(), ConnectionState::Connected);
    assert_eq!(conn.next_deadline(), None);
});
