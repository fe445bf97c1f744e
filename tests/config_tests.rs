// Config loading and validation tests

use std::time::Duration;

use sysdash::config::{AppConfig, DEFAULT_BASE_URL, DashboardView};

const VALID_CONFIG: &str = r#"
[source]
base_url = "http://metrics.local:3000"
view = "full"

[polling]
process_interval_secs = 5
full_interval_secs = 30

[smoothing]
factor = 0.5
step_threshold = 50.0

[expansion]
evict_after_updates = 10
"#;

#[test]
fn test_config_loads_from_str() {
    let config = AppConfig::load_from_str(VALID_CONFIG).expect("load_from_str");
    assert_eq!(config.source.base_url, "http://metrics.local:3000");
    assert_eq!(config.source.view, DashboardView::Full);
    assert_eq!(config.polling.process_interval_secs, 5);
    assert_eq!(config.polling.full_interval_secs, 30);
    assert_eq!(config.smoothing.factor, 0.5);
    assert_eq!(config.expansion.evict_after_updates, Some(10));
}

#[test]
fn test_config_defaults_when_sections_omitted() {
    let config = AppConfig::load_from_str("").expect("empty config is valid");
    assert_eq!(config.source.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.source.view, DashboardView::Processes);
    assert_eq!(config.poll_interval(), Duration::from_secs(5));
    let policy = config.smoothing_policy();
    assert_eq!(policy.factor, 0.5);
    assert_eq!(policy.step_threshold, 50.0);
    assert_eq!(config.expansion.evict_after_updates, None);
}

#[test]
fn test_poll_interval_follows_view() {
    let full = AppConfig::load_from_str(VALID_CONFIG).unwrap();
    assert_eq!(full.poll_interval(), Duration::from_secs(30));

    let processes = VALID_CONFIG.replace("view = \"full\"", "view = \"processes\"");
    let processes = AppConfig::load_from_str(&processes).unwrap();
    assert_eq!(processes.poll_interval(), Duration::from_secs(5));
}

#[test]
fn test_view_paths() {
    assert_eq!(DashboardView::Full.path(), "/metrics");
    assert_eq!(DashboardView::Processes.path(), "/processes");
}

#[test]
fn test_config_validation_rejects_bad_scheme() {
    let bad = VALID_CONFIG.replace("http://metrics.local:3000", "metrics.local:3000");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("source.base_url"));
}

#[test]
fn test_config_validation_rejects_unknown_view() {
    let bad = VALID_CONFIG.replace("view = \"full\"", "view = \"charts\"");
    assert!(AppConfig::load_from_str(&bad).is_err());
}

#[test]
fn test_config_validation_rejects_process_interval_zero() {
    let bad = VALID_CONFIG.replace("process_interval_secs = 5", "process_interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("process_interval_secs"));
}

#[test]
fn test_config_validation_rejects_full_interval_zero() {
    let bad = VALID_CONFIG.replace("full_interval_secs = 30", "full_interval_secs = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("full_interval_secs"));
}

#[test]
fn test_config_validation_rejects_smoothing_factor_out_of_range() {
    for factor in ["0.0", "1.5", "-0.2"] {
        let bad = VALID_CONFIG.replace("factor = 0.5", &format!("factor = {}", factor));
        let err = AppConfig::load_from_str(&bad).unwrap_err();
        assert!(err.to_string().contains("smoothing.factor"), "factor {}", factor);
    }
}

#[test]
fn test_config_validation_rejects_negative_step_threshold() {
    let bad = VALID_CONFIG.replace("step_threshold = 50.0", "step_threshold = -1.0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("step_threshold"));
}

#[test]
fn test_config_validation_rejects_zero_eviction() {
    let bad = VALID_CONFIG.replace("evict_after_updates = 10", "evict_after_updates = 0");
    let err = AppConfig::load_from_str(&bad).unwrap_err();
    assert!(err.to_string().contains("evict_after_updates"));
}

#[test]
fn test_config_validation_rejects_invalid_toml() {
    let err = AppConfig::load_from_str("not valid toml [[[").unwrap_err();
    assert!(!err.to_string().is_empty());
}

// Env-var tests share process state, so they run as one test.
#[test]
fn test_config_load_from_file_and_env() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, VALID_CONFIG).unwrap();

    unsafe {
        std::env::set_var("CONFIG_FILE", path.to_str().unwrap());
        std::env::remove_var("API_URL");
    }
    let from_file = AppConfig::load();

    unsafe { std::env::set_var("API_URL", "http://override:9000") };
    let overridden = AppConfig::load();

    unsafe { std::env::set_var("CONFIG_FILE", dir.path().join("missing.toml")) };
    let defaults_with_env = AppConfig::load();

    unsafe {
        std::env::remove_var("CONFIG_FILE");
        std::env::remove_var("API_URL");
    }

    let config = from_file.expect("load from CONFIG_FILE");
    assert_eq!(config.source.base_url, "http://metrics.local:3000");
    assert_eq!(config.source.view, DashboardView::Full);

    let config = overridden.expect("load with API_URL");
    assert_eq!(config.source.base_url, "http://override:9000");

    let config = defaults_with_env.expect("missing file falls back to defaults");
    assert_eq!(config.source.base_url, "http://override:9000");
    assert_eq!(config.source.view, DashboardView::Processes);
}
