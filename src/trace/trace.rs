use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::zephyr::model::{TestRunId, TestStatus};

/// One line of the JSONL lifecycle trace.
#[derive(Debug, Clone, Serialize)]
pub struct LifecycleEvent {
    pub timestamp_ms: u128,
    pub operation: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_case: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_run_id: Option<TestRunId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TestStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u64>,

    pub outcome: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LifecycleEvent {
    pub fn now(operation: &str) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            operation: operation.to_string(),
            test_case: None,
            test_run_id: None,
            status: None,
            status_code: None,
            outcome: "ok".to_string(),
            error: None,
        }
    }

    pub fn with_test_case(mut self, folder: &str, name: &str) -> Self {
        self.test_case = Some(format!("{}/{}", folder, name));
        self
    }

    pub fn with_run(mut self, test_run_id: TestRunId) -> Self {
        self.test_run_id = Some(test_run_id);
        self
    }

    pub fn with_status(mut self, status: TestStatus, status_code: u64) -> Self {
        self.status = Some(status);
        self.status_code = Some(status_code);
        self
    }

    pub fn with_outcome(mut self, outcome: impl ToString) -> Self {
        self.outcome = outcome.to_string();
        self
    }

    pub fn with_error(mut self, error: &dyn std::error::Error) -> Self {
        self.outcome = "error".to_string();
        self.error = Some(error.to_string());
        self
    }
}
