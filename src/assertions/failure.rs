use serde::Serialize;
use serde_json::Value;

/// Separator placed between failure messages in an aggregate failure.
pub const FAILURE_SEPARATOR: &str = ", \n";

/// One captured soft-assert failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailureRecord {
    /// Primitive that produced the failure (e.g. `equals`)
    pub operation: &'static str,

    /// Human-readable failure message
    pub message: String,

    /// Value under test, if there was one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,

    /// Expected value or pattern, if there was one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
}

impl FailureRecord {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
            actual: None,
            expected: None,
        }
    }

    pub fn with_actual(mut self, actual: Option<&Value>) -> Self {
        self.actual = actual.cloned();
        self
    }

    pub fn with_expected(mut self, expected: Option<&Value>) -> Self {
        self.expected = expected.cloned();
        self
    }
}

impl std::fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// All failures drained by `SoftAssert::assert_all`, in occurrence order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateFailure {
    pub failures: Vec<FailureRecord>,
}

impl AggregateFailure {
    /// Failure messages joined in the order they were recorded.
    pub fn message(&self) -> String {
        self.failures
            .iter()
            .map(|f| f.message.as_str())
            .collect::<Vec<_>>()
            .join(FAILURE_SEPARATOR)
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl std::fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AggregateFailure {}
