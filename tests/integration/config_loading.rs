use std::io::Write;

use parking_lot::{const_mutex, Mutex};
use patrol_swarm::config::{ConfigLoader, SwarmConfig};
use patrol_swarm::error::SwarmError;
use tempfile::NamedTempFile;

// The loader always overlays SWARM__* variables, so tests touching the
// environment run one at a time.
static ENV_LOCK: Mutex<()> = const_mutex(());

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn file_values_override_defaults() {
    let _guard = ENV_LOCK.lock();
    let file = config_file(
        r#"
bid_timeout = 2.5
pursuer_cap = 3
election_cooldown = 4.0

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = ConfigLoader::load_from_file(file.path()).unwrap();

    assert_eq!(config.bid_timeout, 2.5);
    assert_eq!(config.pursuer_cap, 3);
    assert_eq!(config.election_cooldown, 4.0);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.search_wait, SwarmConfig::default().search_wait);
    assert_eq!(config.chase_speed, SwarmConfig::default().chase_speed);
}

#[test]
fn invalid_value_is_rejected() {
    let _guard = ENV_LOCK.lock();
    let file = config_file("pursuer_cap = 0\n");

    let err = ConfigLoader::load_from_file(file.path()).unwrap_err();

    assert!(matches!(err, SwarmError::ConfigError(ref msg) if msg.contains("pursuer_cap")));
}

#[test]
fn negative_timing_is_rejected() {
    let _guard = ENV_LOCK.lock();
    let file = config_file("door_grace = -1.0\n");

    let err = ConfigLoader::load_from_file(file.path()).unwrap_err();

    assert!(matches!(err, SwarmError::ConfigError(ref msg) if msg.contains("door_grace")));
}

#[test]
fn missing_file_is_an_error() {
    let _guard = ENV_LOCK.lock();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = ConfigLoader::load_from_file(&path).unwrap_err();

    assert!(matches!(err, SwarmError::ConfigSource(_)));
}

#[test]
fn environment_overrides_file() {
    let _guard = ENV_LOCK.lock();
    let file = config_file("pursuer_cap = 3\nbid_timeout = 2.0\n");

    std::env::set_var("SWARM__PURSUER_CAP", "4");
    let result = ConfigLoader::load_from_file(file.path());
    std::env::remove_var("SWARM__PURSUER_CAP");

    let config = result.unwrap();
    assert_eq!(config.pursuer_cap, 4);
    assert_eq!(config.bid_timeout, 2.0);
}
