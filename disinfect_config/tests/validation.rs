use disinfect_config::{load_file, load_toml};
use rstest::rstest;
use std::fs;
use tempfile::tempdir;

const FULL: &str = r#"
[server]
bind = "0.0.0.0:8080"

[monitor]
tick_ms = 250
auto_start_after_s = 10

[device]
default_program = 1
custom_days = 3
max_custom_days = 30
brightness = 40

[logging]
level = "debug"
rotation = "daily"

[[programs]]
id = 1
name = "Short"
days = 2

[[programs]]
id = 9
name = "Custom"
custom = true
"#;

#[test]
fn accepts_full_config() {
    let cfg = load_toml(FULL).expect("parse TOML");
    cfg.validate().expect("valid config should pass");
    assert_eq!(cfg.server.bind, "0.0.0.0:8080");
    assert_eq!(cfg.monitor.tick_ms, 250);
    assert_eq!(cfg.programs.len(), 2);
    assert!(cfg.programs[1].custom);
}

#[test]
fn partial_sections_keep_other_defaults() {
    let cfg = load_toml("[device]\ncustom_days = 10\n").expect("parse TOML");
    cfg.validate().expect("valid");
    assert_eq!(cfg.device.custom_days, 10);
    assert_eq!(cfg.device.default_program, 2);
    assert_eq!(cfg.programs.len(), 4);
}

#[test]
fn custom_days_are_unbounded_without_a_cap() {
    let cfg = load_toml("[device]\ncustom_days = 400\n").expect("parse TOML");
    cfg.validate().expect("no cap configured");
    assert_eq!(cfg.device.max_custom_days, None);
}

#[rstest]
#[case("[monitor]\ntick_ms = 0\n", "monitor.tick_ms")]
#[case("[monitor]\ntick_ms = 1500\n", "monitor.tick_ms")]
#[case("[monitor]\nauto_start_after_s = 0\n", "auto_start_after_s")]
#[case("[device]\ncustom_days = 0\n", "device.custom_days")]
#[case("[device]\ncustom_days = 40\nmax_custom_days = 30\n", "device.custom_days")]
#[case("[device]\nmax_custom_days = 0\n", "device.max_custom_days")]
#[case("[device]\nbrightness = 101\n", "device.brightness")]
#[case("[device]\ndefault_program = 7\n", "not in the program catalog")]
#[case("[logging]\nrotation = \"weekly\"\n", "logging.rotation")]
#[case(
    "[[programs]]\nid = 2\nname = \"A\"\ndays = 1\n[[programs]]\nid = 2\nname = \"B\"\ndays = 2\n",
    "duplicate id"
)]
#[case("[[programs]]\nid = 2\nname = \"A\"\ndays = 0\n", "days must be >= 1")]
#[case("[[programs]]\nid = 2\nname = \"A\"\n", "one of days or custom")]
#[case(
    "[[programs]]\nid = 2\nname = \"A\"\ndays = 3\ncustom = true\n",
    "not both"
)]
#[case("[[programs]]\nid = 2\nname = \" \"\ndays = 3\n", "name must not be empty")]
fn rejects_invalid_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should be rejected");
    assert!(
        format!("{err}").contains(needle),
        "error `{err}` should mention `{needle}`"
    );
}

#[test]
fn rejects_wrong_types_at_parse_time() {
    assert!(load_toml("[device]\ncustom_days = \"seven\"\n").is_err());
}

#[test]
fn load_file_reads_and_validates() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("good.toml");
    fs::write(&good, FULL).unwrap();
    let cfg = load_file(&good).expect("load good file");
    assert_eq!(cfg.device.default_program, 1);

    let bad = dir.path().join("bad.toml");
    fs::write(&bad, "[monitor]\ntick_ms = 0\n").unwrap();
    let err = load_file(&bad).expect_err("invalid file must fail");
    assert!(format!("{err}").contains("monitor.tick_ms"));

    let missing = dir.path().join("missing.toml");
    let err = load_file(&missing).expect_err("missing file must fail");
    assert!(format!("{err}").contains("read config"));
}

#[test]
fn sample_config_matches_factory_defaults() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../etc/disinfect.toml");
    let cfg = load_file(&path).expect("sample config loads");
    let defaults = disinfect_config::Config::default();
    assert_eq!(cfg.programs, defaults.programs);
    assert_eq!(cfg.server.bind, defaults.server.bind);
    assert_eq!(cfg.device.default_program, defaults.device.default_program);
    assert_eq!(cfg.device.custom_days, defaults.device.custom_days);
    assert_eq!(cfg.device.max_custom_days, defaults.device.max_custom_days);
    assert_eq!(cfg.monitor.tick_ms, defaults.monitor.tick_ms);
}
