use serial_test::serial;
use std::path::PathBuf;
use wards::config::{load_from_env, WardsConfig, DEFAULT_BED_COUNT};

fn clear_env() {
    std::env::remove_var("WARDS_BED_COUNT");
    std::env::remove_var("WARDS_STATE_DIR");
}

#[test]
#[serial]
fn given_no_env_when_loaded_then_defaults() {
    clear_env();
    assert_eq!(load_from_env(), WardsConfig::default());
    assert_eq!(load_from_env().bed_count, DEFAULT_BED_COUNT);
}

#[test]
#[serial]
fn given_env_when_loaded_then_values_used() {
    clear_env();
    std::env::set_var("WARDS_BED_COUNT", "24");
    std::env::set_var("WARDS_STATE_DIR", "/tmp/ward-a");

    let cfg = load_from_env();
    assert_eq!(cfg.bed_count, 24);
    assert_eq!(cfg.state_dir, PathBuf::from("/tmp/ward-a"));
    clear_env();
}

#[test]
#[serial]
fn given_bad_bed_count_when_loaded_then_default_kept() {
    clear_env();
    for raw in ["0", "many", "-2", "  "] {
        std::env::set_var("WARDS_BED_COUNT", raw);
        assert_eq!(load_from_env().bed_count, DEFAULT_BED_COUNT, "{raw}");
    }
    clear_env();
}
