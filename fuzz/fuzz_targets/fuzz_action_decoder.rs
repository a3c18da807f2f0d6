#![no_main]
use libfuzzer_sys::fuzz_target;
use std::time::Instant;

// Decoding and applying arbitrary action bodies never panics and keeps the
// motor flag in step with the run status.
fuzz_target!(|data: &[u8]| {
    let Ok(body) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let mut device = disinfect_core::DeviceState::default();
    let now = Instant::now();
    if let Ok(action) = disinfect_core::Action::from_json(&body) {
        let _ = device.apply(action, now);
    }
    device.tick(now);
    assert_eq!(
        device.motor_active(),
        device.run_status() == disinfect_core::RunStatus::Running
    );
});
