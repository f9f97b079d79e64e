use thiserror::Error;

use crate::config::error::ConfigError;
use crate::config::guard::MissingValues;

#[derive(Debug, Error)]
pub enum ZephyrError {
    /// The request never produced a response
    #[error("request failed ({context}): {source}")]
    Transport {
        context: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Response body did not match the expected shape
    #[error("JSON parse error ({context}): {source}")]
    JsonParse { context: String, source: serde_json::Error },

    /// Request payload could not be serialized
    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize { context: String, source: serde_json::Error },

    /// The service answered with a status other than the one the protocol requires
    #[error("[{operation}] expected status {expected} but got {actual}: {body}")]
    UnexpectedStatus {
        operation: &'static str,
        expected: u16,
        actual: u16,
        body: String,
    },

    /// No catalog entry matches (folder, name)
    #[error("no testcase found with name: {name}, in folder: {folder}")]
    TestCaseNotFound { folder: String, name: String },

    /// More than one catalog entry matches (folder, name)
    #[error("{count} testcases found with name: {name}, in folder: {folder}")]
    AmbiguousTestCase { folder: String, name: String, count: usize },

    /// No Jira account carries any of the configured display names
    #[error("no Jira account found with display name(s): {}", .display_names.join(", "))]
    AccountNotFound { display_names: Vec<String> },

    /// A lifecycle step was called out of order
    #[error("cannot {operation} while the test run lifecycle is {state}")]
    InvalidTransition { operation: &'static str, state: String },

    /// Execution timestamp could not be formatted
    #[error("could not format execution timestamp: {0}")]
    Timestamp(#[from] time::error::Format),

    /// Client construction failed on a configuration problem
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Missing(#[from] MissingValues),
}
