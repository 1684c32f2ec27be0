use okr_core::config::{DEFAULT_API_BASE_URL, DEFAULT_BIND_ADDR};
use okr_core::{ConfigError, DashboardConfig};
use std::collections::HashMap;
use std::path::PathBuf;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_point_client_at_local_server() {
    let config = DashboardConfig::default();

    assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
    assert_eq!(config.request_timeout_ms, None);
    assert_eq!(config.db_path, None);
    assert!(!config.seed_demo_data);
}

#[test]
fn toml_overrides_only_given_keys() {
    let config = DashboardConfig::from_toml_str(
        r#"
        api_base_url = "http://okr.internal:9000/"
        request_timeout_ms = 2500
        seed_demo_data = true
        "#,
    )
    .unwrap();

    assert_eq!(config.api_base_url, "http://okr.internal:9000/");
    assert_eq!(config.request_timeout_ms, Some(2500));
    assert!(config.seed_demo_data);
    assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
}

#[test]
fn unknown_toml_keys_are_rejected() {
    let err = DashboardConfig::from_toml_str("api_url = \"x\"").unwrap_err();
    assert!(err.contains("api_url"), "unexpected message: {err}");
}

#[test]
fn environment_wins_over_file_values() {
    let mut config =
        DashboardConfig::from_toml_str("db_path = \"/var/lib/okr.db\"\nlog_level = \"warn\"")
            .unwrap();

    config
        .apply_env(env(&[
            ("OKR_DB_PATH", ""),
            ("OKR_LOG_LEVEL", "debug"),
            ("OKR_SEED_DEMO_DATA", "yes"),
            ("OKR_REQUEST_TIMEOUT_MS", "750"),
            ("OKR_BIND_ADDR", "0.0.0.0:9999"),
        ]))
        .unwrap();

    assert_eq!(config.db_path, None);
    assert_eq!(config.log_level, "debug");
    assert!(config.seed_demo_data);
    assert_eq!(config.request_timeout_ms, Some(750));
    assert_eq!(config.bind_addr, "0.0.0.0:9999");
}

#[test]
fn invalid_environment_values_name_the_key() {
    let mut config = DashboardConfig::default();
    let err = config
        .apply_env(env(&[("OKR_REQUEST_TIMEOUT_MS", "soon")]))
        .unwrap_err();
    assert!(matches!(
        err,
        ConfigError::InvalidValue { key: "OKR_REQUEST_TIMEOUT_MS", .. }
    ));

    let err = config
        .apply_env(env(&[("OKR_SEED_DEMO_DATA", "maybe")]))
        .unwrap_err();
    assert_eq!(err.to_string(), "invalid value `maybe` for OKR_SEED_DEMO_DATA");
}

#[test]
fn config_file_is_read_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("okr.toml");
    std::fs::write(&path, "db_path = \"okr.db\"\n").unwrap();

    let config = DashboardConfig::from_file(&path).unwrap();
    assert_eq!(config.db_path, Some(PathBuf::from("okr.db")));

    let missing = DashboardConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(missing, ConfigError::Io { .. }));

    std::fs::write(&path, "seed_demo_data = \"sometimes\"\n").unwrap();
    let bad = DashboardConfig::from_file(&path).unwrap_err();
    assert!(matches!(bad, ConfigError::Parse { .. }));
}
