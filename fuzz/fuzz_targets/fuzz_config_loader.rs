#![no_main]
use libfuzzer_sys::fuzz_target;

// Any TOML text either fails to parse, fails validation, or builds a device.
fuzz_target!(|data: &str| {
    let Ok(cfg) = disinfect_config::load_toml(data) else {
        return;
    };
    if cfg.validate().is_err() {
        return;
    }
    // A validated config must always convert.
    let state = disinfect_core::DeviceState::try_from(&cfg);
    assert!(state.is_ok(), "validated config rejected: {:?}", state.err());
});
