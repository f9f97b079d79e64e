use thiserror::Error;

/// A soft-assert primitive was called incorrectly.
///
/// These are faults in the test script itself, never domain failures, so
/// they are returned to the caller instead of being accumulated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssertUsageError {
    /// A required argument was absent (or null where null is not allowed)
    #[error("[{operation}] please provide the {arguments} argument(s)")]
    MissingArgument {
        operation: &'static str,
        arguments: &'static str,
    },

    /// An argument had the wrong JSON type
    #[error("[{operation}] argument '{argument}' must be {expected}, got {actual}")]
    InvalidArgument {
        operation: &'static str,
        argument: &'static str,
        expected: &'static str,
        actual: &'static str,
    },
}
