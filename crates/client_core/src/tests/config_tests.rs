use super::{load_settings, ConfigError, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_config(contents: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("rul_client_config_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("config.toml");
    fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn defaults_point_at_local_service() {
    let settings = Settings::default();
    assert_eq!(settings.server_url, "http://localhost:8000");
    assert_eq!(settings.request_timeout_secs, 30);
    assert_eq!(settings.gauge_scale().ceiling(), 200.0);
    settings.validate().expect("defaults are valid");
}

#[test]
fn file_values_override_defaults() {
    let path = temp_config(
        "server_url = \"https://rul.example.net\"\nrequest_timeout_secs = 5\ngauge_ceiling = 150.0\n",
    );

    let mut settings = Settings::default();
    settings.apply_file(&path).expect("apply");

    assert_eq!(settings.server_url, "https://rul.example.net");
    assert_eq!(settings.request_timeout_secs, 5);
    assert_eq!(settings.gauge_ceiling, 150.0);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn partial_file_keeps_remaining_defaults() {
    let path = temp_config("gauge_ceiling = 250.0\n");

    let mut settings = Settings::default();
    settings.apply_file(&path).expect("apply");

    assert_eq!(settings.server_url, "http://localhost:8000");
    assert_eq!(settings.gauge_ceiling, 250.0);

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn malformed_file_is_a_parse_error() {
    let path = temp_config("server_url = [");

    let err = Settings::default().apply_file(&path).expect_err("must fail");
    assert!(matches!(err, ConfigError::Parse { .. }), "{err:?}");

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn load_settings_skips_unreadable_explicit_file() {
    let missing = env::temp_dir().join("rul_client_config_does_not_exist.toml");
    let settings = load_settings(Some(&missing));
    assert_eq!(settings.request_timeout_secs, 30);
}

#[test]
fn env_overrides_apply_with_app_prefix_winning() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("RUL_SERVER_URL", "http://first:8000"),
        ("APP__SERVER_URL", "http://second:9000"),
        ("APP__REQUEST_TIMEOUT_SECS", "12"),
        ("APP__GAUGE_CEILING", "120"),
    ]);

    let mut settings = Settings::default();
    settings.apply_env(|key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(settings.server_url, "http://second:9000");
    assert_eq!(settings.request_timeout_secs, 12);
    assert_eq!(settings.gauge_ceiling, 120.0);
}

#[test]
fn invalid_numeric_env_values_are_ignored() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("APP__REQUEST_TIMEOUT_SECS", "soon"),
        ("APP__GAUGE_CEILING", "tall"),
    ]);

    let mut settings = Settings::default();
    settings.apply_env(|key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(settings, Settings::default());
}

#[test]
fn validate_rejects_bad_values() {
    let settings = Settings {
        server_url: "ftp://example.net".into(),
        ..Settings::default()
    };
    assert!(matches!(
        settings.validate(),
        Err(ConfigError::InvalidServerUrl(_))
    ));

    let settings = Settings {
        request_timeout_secs: 0,
        ..Settings::default()
    };
    assert!(matches!(settings.validate(), Err(ConfigError::InvalidTimeout)));

    let settings = Settings {
        gauge_ceiling: 0.0,
        ..Settings::default()
    };
    assert!(matches!(
        settings.validate(),
        Err(ConfigError::InvalidGaugeCeiling(_))
    ));
}
