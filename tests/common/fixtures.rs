use zephyr_harness::config::settings::{Settings, ZephyrConfig};
use zephyr_harness::zephyr::catalog::Catalog;
use zephyr_harness::zephyr::client::ZephyrClient;
use zephyr_harness::zephyr::model::{Folder, TestCase};

use crate::common::mock_transport::MockTransport;

pub fn full_config() -> ZephyrConfig {
    ZephyrConfig {
        service_url: Some("https://jira.example.com/".into()),
        zephyr_url: Some("https://api.zephyrscale.example.com/v2".into()),
        jira_url: Some("https://example.atlassian.net".into()),
        folder_name: Some("Smoke".into()),
        zephyr_api_token: Some("zephyr-token".into()),
        jira_api_token: Some("amlyYTp0b2tlbg==".into()),
        environment: Some("staging".into()),
        project_key: Some("QA".into()),
        project_id: Some("10100".into()),
        username: Some("bot".into()),
        password: Some("secret".into()),
        environment_id: Some(7),
        assigned_user_id: Some("acc-123".into()),
        jira_display_name: Some("Test Bot".into()),
        default_jira_display_name: Some("QA Team".into()),
        status_codes: None,
        trace_file: None,
        timeout_secs: None,
    }
}

pub fn settings() -> Settings {
    Settings::from_config(full_config()).expect("fixture config must validate")
}

pub fn client(transport: MockTransport) -> ZephyrClient<MockTransport> {
    ZephyrClient::new(settings(), transport).expect("fixture client must build")
}

pub fn test_case(id: u64, folder: Option<&str>, name: &str) -> TestCase {
    TestCase {
        id,
        name: name.to_string(),
        key: Some(format!("QA-T{}", id)),
        folder: folder.map(|f| Folder { name: f.to_string() }),
    }
}

pub fn catalog() -> Catalog {
    Catalog::new(vec![
        test_case(1, Some("Smoke"), "Login"),
        test_case(2, Some("Smoke"), "Logout"),
        test_case(3, Some("Regression"), "Login"),
        test_case(4, None, "Orphan"),
    ])
}

pub const CATALOG_BODY: &str = r#"{
  "testCases": [
    { "id": 1, "key": "QA-T1", "name": "Login", "folder": { "name": "Smoke" } },
    { "id": 2, "key": "QA-T2", "name": "Logout", "folder": { "name": "Smoke" } },
    { "id": 3, "key": "QA-T3", "name": "Login", "folder": { "name": "Regression" } },
    { "id": 4, "key": "QA-T4", "name": "Orphan" }
  ]
}"#;
