#![no_main]

use drumlights_proto::{Command, StateNotification};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(notification) = StateNotification::decode(text) {
        let encoded = notification.encode().unwrap();
        assert_eq!(StateNotification::decode(&encoded).unwrap(), notification);
    }

    let _ = Command::decode(text);
});
