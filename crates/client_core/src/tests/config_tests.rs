use super::*;

use std::{collections::HashMap, fs, time::Duration};

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn defaults_without_file_or_env() {
    let settings = settings_from_sources(None, env_of(&[])).expect("settings");
    assert_eq!(settings, ClientSettings::default());
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn file_values_then_env_overrides() {
    let file = r#"
server_url = "http://predictor.internal:8080/"
request_timeout_secs = 5
"#;
    let settings = settings_from_sources(Some(file), env_of(&[])).expect("settings");
    assert_eq!(settings.server_url, "http://predictor.internal:8080");
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(5)));

    let settings = settings_from_sources(
        Some(file),
        env_of(&[
            ("PREDICTOR_URL", "http://a.example"),
            ("APP__SERVER_URL", "https://b.example/"),
            ("APP__REQUEST_TIMEOUT_SECS", "30"),
        ]),
    )
    .expect("settings");
    assert_eq!(settings.server_url, "https://b.example");
    assert_eq!(settings.request_timeout_secs, Some(30));
}

#[test]
fn unparseable_timeout_env_is_ignored() {
    let settings = settings_from_sources(None, env_of(&[("APP__REQUEST_TIMEOUT_SECS", "soon")]))
        .expect("settings");
    assert_eq!(settings.request_timeout_secs, None);
}

#[test]
fn zero_timeout_means_none() {
    let settings = ClientSettings {
        request_timeout_secs: Some(0),
        ..ClientSettings::default()
    };
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn rejects_bad_urls() {
    assert!(normalize_server_url("not a url").is_err());
    assert!(normalize_server_url("ftp://example.com").is_err());
    assert!(settings_from_sources(None, env_of(&[("PREDICTOR_URL", "::")])).is_err());
}

#[test]
fn rejects_malformed_settings_file() {
    assert!(settings_from_sources(Some("server_url = ["), env_of(&[])).is_err());
}

#[test]
fn loads_settings_from_explicit_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("predictor.toml");
    fs::write(&path, "request_timeout_secs = 12\n").expect("write settings");

    let settings = load_settings_from(&path).expect("load");
    assert_eq!(settings.request_timeout_secs, Some(12));

    assert!(load_settings_from(&dir.path().join("missing.toml")).is_err());
}
