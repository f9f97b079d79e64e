use serde::{Deserialize, Serialize};

use crate::config::settings::StatusCodes;

/// Identifier the service assigns to a created test run.
pub type TestRunId = u64;

// ============================================================================
// Catalog records
// ============================================================================

/// A test case as listed by the project testcases endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: u64,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Test cases at the project root have no folder
    #[serde(default)]
    pub folder: Option<Folder>,
}

impl TestCase {
    pub fn folder_name(&self) -> Option<&str> {
        self.folder.as_ref().map(|f| f.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
}

/// Body of `GET /rest/tests/1.0/project/{id}/testcases`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseList {
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

// ============================================================================
// Test run creation
// ============================================================================

/// Payload of `POST /rest/tests/1.0/testresult`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTestRun {
    pub test_case_id: u64,
    pub assigned_to: String,
    pub environment_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTestRun {
    pub id: TestRunId,
}

// ============================================================================
// Test result update
// ============================================================================

/// Outcome of one test execution, as handed to `update_test_result`.
///
/// Absent fields model a caller that did not provide them: a missing run id
/// is rejected, a missing status is reported as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultDetails {
    pub test_run_id: Option<TestRunId>,
    pub test_status: Option<bool>,
}

impl TestResultDetails {
    pub fn new(test_run_id: TestRunId, test_status: Option<bool>) -> Self {
        Self {
            test_run_id: Some(test_run_id),
            test_status,
        }
    }
}

/// Tri-state test outcome. Anything not explicitly passed counts as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    Unrecognized,
}

impl From<Option<bool>> for TestStatus {
    fn from(status: Option<bool>) -> Self {
        match status {
            Some(true) => TestStatus::Passed,
            Some(false) => TestStatus::Failed,
            None => TestStatus::Unrecognized,
        }
    }
}

impl TestStatus {
    pub fn status_code(self, codes: &StatusCodes) -> u64 {
        match self {
            TestStatus::Passed => codes.passed,
            TestStatus::Failed | TestStatus::Unrecognized => codes.failed,
        }
    }
}

/// One element of the `PUT /rest/tests/1.0/testresult` payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultBody {
    pub id: TestRunId,
    pub test_result_status_id: u64,
    pub user_key: String,
    pub execution_date: String,
    pub actual_start_date: String,
}

// ============================================================================
// Auxiliary lookups
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
}

/// Body of `GET /environments?projectKey=...`.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentList {
    #[serde(default)]
    pub values: Vec<Environment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JiraAccount {
    pub account_id: String,

    #[serde(default)]
    pub display_name: Option<String>,
}
