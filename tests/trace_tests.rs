use serde_json::Value;

use zephyr_harness::config::{error::ConfigError, settings::Settings};
use zephyr_harness::trace::{logger::TraceLogger, trace::LifecycleEvent};
use zephyr_harness::zephyr::{
    client::ZephyrClient,
    error::ZephyrError,
    model::{TestResultDetails, TestStatus},
};

use crate::common::{
    fixtures::{catalog, full_config, settings},
    mock_transport::MockTransport,
};

mod common;

fn read_events(path: &std::path::Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn logger_appends_one_json_line_per_event() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");
    let logger = TraceLogger::open(path.to_str().unwrap()).unwrap();
    assert!(logger.is_enabled());

    logger.record(
        &LifecycleEvent::now("create_new_testrun")
            .with_test_case("Smoke", "Login")
            .with_run(9),
    );
    logger.record(
        &LifecycleEvent::now("update_test_result")
            .with_run(9)
            .with_status(TestStatus::Failed, 10167),
    );

    let events = read_events(&path);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["test_case"], "Smoke/Login");
    assert_eq!(events[0]["outcome"], "ok");
    assert_eq!(events[1]["status"], "failed");
    assert_eq!(events[1]["status_code"], 10167);
}

#[test]
fn reopening_appends_to_existing_trace() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trace.jsonl");
    let path = path.to_str().unwrap();

    TraceLogger::open(path).unwrap().record(&LifecycleEvent::now("get_all_testcases"));
    TraceLogger::open(path).unwrap().record(&LifecycleEvent::now("create_new_testrun"));

    let events = read_events(std::path::Path::new(path));
    assert_eq!(events.len(), 2);
    assert_eq!(events[1]["operation"], "create_new_testrun");
}

#[test]
fn no_trace_file_means_disabled_logger() {
    let logger = TraceLogger::for_settings(&settings()).unwrap();
    assert!(!logger.is_enabled());
    logger.record(&LifecycleEvent::now("get_all_testcases"));
}

#[test]
fn unopenable_trace_file_is_a_config_error() {
    match TraceLogger::open("/nonexistent-dir/trace.jsonl") {
        Err(ConfigError::TraceFile { path, .. }) => {
            assert_eq!(path, "/nonexistent-dir/trace.jsonl");
        }
        Err(other) => panic!("Expected TraceFile, got {:?}", other),
        Ok(_) => panic!("Expected TraceFile, got an open logger"),
    }
}

#[test]
fn client_construction_fails_on_unopenable_trace_file() {
    let mut config = full_config();
    config.trace_file = Some("/nonexistent-dir/trace.jsonl".to_string());
    let settings = Settings::from_config(config).unwrap();

    let result = ZephyrClient::new(settings, MockTransport::new());
    assert!(matches!(
        result,
        Err(ZephyrError::Config(ConfigError::TraceFile { .. }))
    ));
}

#[test]
fn client_traces_lifecycle_operations() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lifecycle.jsonl");

    let mut config = full_config();
    config.trace_file = Some(path.to_str().unwrap().to_string());
    let settings = Settings::from_config(config).unwrap();

    let transport = MockTransport::new();
    transport.push(201, r#"{ "id": 31 }"#);
    transport.push(200, "");
    let client = ZephyrClient::new(settings, transport).unwrap();

    let catalog = catalog();
    let run_id = client.create_new_testrun(&catalog, "Smoke", "Login").unwrap();
    client.update_test_result(&TestResultDetails::new(run_id, None)).unwrap();
    assert!(client.create_new_testrun(&catalog, "Smoke", "Nope").is_err());

    let events = read_events(&path);
    assert_eq!(events.len(), 3);
    assert_eq!(events[0]["operation"], "create_new_testrun");
    assert_eq!(events[0]["test_run_id"], 31);
    assert_eq!(events[1]["operation"], "update_test_result");
    assert_eq!(events[1]["status"], "unrecognized");
    assert_eq!(events[1]["status_code"], 10167);
    assert_eq!(events[2]["outcome"], "error");
    assert!(events[2]["error"].as_str().unwrap().contains("Nope"));
}
