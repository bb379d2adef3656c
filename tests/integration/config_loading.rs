//! Integration tests for service configuration loading.

use tempfile::TempDir;
use virt_profiles::config::ServiceConfig;
use virt_profiles::merge::ConflictPolicy;

#[test]
fn test_config_loads_from_toml_file() {
    let dir = TempDir::new().unwrap();
    let config_file = dir.path().join("virt-profiles.toml");

    std::fs::write(
        &config_file,
        r#"
host = "0.0.0.0"
port = 9090
profiles_dir = "/var/lib/virt-profiles"
sort_presets = false
conflict_policy = "fail"

[logging]
level = "debug"
format = "json"
"#,
    )
    .unwrap();

    let config = ServiceConfig::load(Some(&config_file)).unwrap();
    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 9090);
    assert_eq!(
        config.profiles_dir,
        std::path::PathBuf::from("/var/lib/virt-profiles")
    );
    assert!(!config.sort_presets);
    assert_eq!(config.conflict_policy, ConflictPolicy::Fail);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.listen_address(), "0.0.0.0:9090");
}

#[test]
fn test_partial_file_keeps_defaults_for_the_rest() {
    let dir = TempDir::new().unwrap();
    let config_file = dir.path().join("partial.toml");

    std::fs::write(&config_file, "port = 8181\n").unwrap();

    let config = ServiceConfig::load(Some(&config_file)).unwrap();
    assert_eq!(config.port, 8181);
    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.conflict_policy, ConflictPolicy::Warn);
    assert!(config.sort_presets);
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(ServiceConfig::load(Some(&missing)).is_err());
}
