use std::collections::HashMap;
use std::io::Write;

use zephyr_harness::config::{
    error::ConfigError,
    guard::{MissingValues, validate_values},
    settings::{Settings, StatusCodes, ZephyrConfig, load_config},
};

use crate::common::fixtures::full_config;

mod common;

// ============================================================================
// Presence guard
// ============================================================================

#[test]
fn validate_values_passes_when_all_present() {
    assert!(validate_values("caller", &[("a", true), ("b", true)]).is_ok());
    assert!(validate_values("caller", &[]).is_ok());
}

#[test]
fn validate_values_names_caller_and_every_missing_field() {
    let err = validate_values("createRun", &[("a", true), ("b", false), ("c", false)]).unwrap_err();
    assert_eq!(
        err,
        MissingValues {
            caller: "createRun",
            missing: vec!["b", "c"],
        }
    );
    assert_eq!(err.to_string(), "[createRun] one or more parameter values are missing: b, c");
}

// ============================================================================
// Settings validation
// ============================================================================

#[test]
fn settings_from_full_config() {
    let settings = Settings::from_config(full_config()).unwrap();
    assert_eq!(settings.service_url, "https://jira.example.com");
    assert_eq!(settings.environment_id, 7);
    assert_eq!(settings.status_codes, StatusCodes { passed: 10166, failed: 10167 });
    assert_eq!(settings.timeout, None);
}

#[test]
fn settings_reject_missing_fields_under_init() {
    let mut config = full_config();
    config.jira_url = None;
    config.environment_id = None;

    match Settings::from_config(config) {
        Err(ConfigError::Missing(missing)) => {
            assert_eq!(missing.caller, "init");
            assert_eq!(missing.missing, vec!["jira_url", "environment_id"]);
        }
        other => panic!("Expected Missing, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn settings_debug_redacts_secrets() {
    let settings = Settings::from_config(full_config()).unwrap();
    let debug = format!("{:?}", settings);
    assert!(!debug.contains("secret"));
    assert!(!debug.contains("zephyr-token"));
    assert!(debug.contains("<redacted>"));
}

// ============================================================================
// YAML loading
// ============================================================================

#[test]
fn load_config_reads_yaml_with_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
service_url: "https://jira.example.com"
project_key: "QA"
environment_id: 3
status_codes:
  passed: 1
"#
    )
    .unwrap();

    let config = load_config(file.path().to_str().unwrap()).unwrap();
    assert_eq!(config.service_url.as_deref(), Some("https://jira.example.com"));
    assert_eq!(config.project_key.as_deref(), Some("QA"));
    assert_eq!(config.environment_id, Some(3));
    assert_eq!(config.status_codes, Some(StatusCodes { passed: 1, failed: 10167 }));
    assert_eq!(config.password, None);
}

#[test]
fn load_config_reports_missing_file() {
    match load_config("/nonexistent/zephyr-harness.yaml") {
        Err(ConfigError::Read { path, .. }) => assert_eq!(path, "/nonexistent/zephyr-harness.yaml"),
        other => panic!("Expected Read error, got {:?}", other),
    }
}

#[test]
fn load_config_reports_malformed_yaml() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "environment_id: [not, a, number]").unwrap();
    assert!(matches!(
        load_config(file.path().to_str().unwrap()),
        Err(ConfigError::Parse { .. })
    ));
}

// ============================================================================
// Environment and merging
// ============================================================================

#[test]
fn from_lookup_reads_named_variables() {
    let vars: HashMap<&str, &str> = [
        ("ZEPHYR_SERVICE_URL", "https://svc"),
        ("JIRA_DISPLAY_NAME", "Test Bot"),
        ("ZEPHYR_ENVIRONMENT_ID", " 12 "),
        ("ZEPHYR_TIMEOUT_SECS", "30"),
    ]
    .into_iter()
    .collect();

    let config = ZephyrConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
    assert_eq!(config.service_url.as_deref(), Some("https://svc"));
    assert_eq!(config.jira_display_name.as_deref(), Some("Test Bot"));
    assert_eq!(config.environment_id, Some(12));
    assert_eq!(config.timeout_secs, Some(30));
    assert_eq!(config.zephyr_url, None);
}

#[test]
fn from_lookup_rejects_non_numeric_ids() {
    let result = ZephyrConfig::from_lookup(|name| {
        (name == "ZEPHYR_ENVIRONMENT_ID").then(|| "staging".to_string())
    });
    assert!(matches!(
        result,
        Err(ConfigError::InvalidEnv { name: "ZEPHYR_ENVIRONMENT_ID", .. })
    ));
}

#[test]
fn merge_prefers_overlay_values() {
    let base = full_config();
    let overlay = ZephyrConfig {
        project_key: Some("OTHER".into()),
        trace_file: Some("trace.jsonl".into()),
        ..ZephyrConfig::default()
    };

    let merged = base.clone().merge(overlay);
    assert_eq!(merged.project_key.as_deref(), Some("OTHER"));
    assert_eq!(merged.trace_file.as_deref(), Some("trace.jsonl"));
    assert_eq!(merged.service_url, base.service_url);

    let settings = Settings::from_config(merged).unwrap();
    assert_eq!(settings.project_key, "OTHER");
    assert_eq!(settings.trace_file.as_deref(), Some("trace.jsonl"));
}
