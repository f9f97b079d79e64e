use serde_json::Value;

use crate::assertions::compare::{Comparison, describe, own_key_count, strict_equals, type_name};
use crate::assertions::error::AssertUsageError;
use crate::assertions::failure::{AggregateFailure, FailureRecord};

// ============================================================================
// Operands
// ============================================================================

/// Anything that can be viewed as an optional JSON value.
///
/// `None` is the *absent* marker, `Value::Null` the *null* marker. This lets
/// callers pass lookups such as `body.get("id")` straight through: a missing
/// field arrives as absent.
pub trait Operand {
    fn as_operand(&self) -> Option<&Value>;
}

impl Operand for Value {
    fn as_operand(&self) -> Option<&Value> {
        Some(self)
    }
}

impl Operand for Option<Value> {
    fn as_operand(&self) -> Option<&Value> {
        self.as_ref()
    }
}

impl Operand for Option<&Value> {
    fn as_operand(&self) -> Option<&Value> {
        *self
    }
}

impl<T: Operand + ?Sized> Operand for &T {
    fn as_operand(&self) -> Option<&Value> {
        (**self).as_operand()
    }
}

// ============================================================================
// SoftAssert
// ============================================================================

/// Accumulates assertion failures for one test execution unit.
///
/// Each primitive evaluates its check and returns whether it passed. A
/// failing check is recorded and control returns to the test; nothing is
/// raised until [`SoftAssert::assert_all`] drains the recorded failures into
/// one [`AggregateFailure`].
///
/// Primitives with required arguments return `Err(AssertUsageError)` when
/// called with absent or mistyped arguments. Those errors are faults in the
/// test script and are never accumulated.
#[derive(Debug, Default)]
pub struct SoftAssert {
    failed_asserts: Vec<FailureRecord>,
}

impl SoftAssert {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict equality: same JSON type and identical value.
    pub fn equals(
        &mut self,
        value: impl Operand,
        expected: impl Operand,
    ) -> Result<bool, AssertUsageError> {
        let (value, expected) = require_pair("equals", "value and condition", &value, &expected)?;
        let passed = strict_equals(value, expected);
        Ok(self.record(passed, || {
            FailureRecord::new("equals", format!("expected {} to equal {}", value, expected))
                .with_actual(Some(value))
                .with_expected(Some(expected))
        }))
    }

    /// Strict inequality.
    pub fn not_equals(
        &mut self,
        value: impl Operand,
        expected: impl Operand,
    ) -> Result<bool, AssertUsageError> {
        let (value, expected) =
            require_pair("notEquals", "value and condition", &value, &expected)?;
        let passed = !strict_equals(value, expected);
        Ok(self.record(passed, || {
            let message = format!("expected {} to not equal {}", value, expected);
            FailureRecord::new("notEquals", message)
                .with_actual(Some(value))
                .with_expected(Some(expected))
        }))
    }

    /// Structural equality; numbers compare numerically.
    pub fn deep_equals(
        &mut self,
        value: impl Operand,
        expected: impl Operand,
    ) -> Result<bool, AssertUsageError> {
        let (value, expected) =
            require_pair("deepEquals", "value and condition", &value, &expected)?;
        let passed = Comparison::DeepEquality.evaluate(value, expected) == Some(true);
        Ok(self.record(passed, || {
            let message = format!("expected {} to deeply equal {}", value, expected);
            FailureRecord::new("deepEquals", message)
                .with_actual(Some(value))
                .with_expected(Some(expected))
        }))
    }

    /// Containment. Two arrays use member semantics, everything else
    /// structural containment (substring, array element, object subset).
    pub fn includes(
        &mut self,
        sample: impl Operand,
        pattern: impl Operand,
    ) -> Result<bool, AssertUsageError> {
        let (sample, pattern) = require_pair("includes", "sample and pattern", &sample, &pattern)?;
        let comparison = Comparison::containment_for(sample, pattern);
        if comparison == Comparison::MemberContainment {
            tracing::debug!("[includes] sample and pattern are arrays, checking members");
        }
        let outcome = comparison.evaluate(sample, pattern);
        Ok(self.record(outcome == Some(true), || {
            let message = match (outcome, comparison) {
                (None, _) => not_comparable(sample, pattern),
                (_, Comparison::MemberContainment) => {
                    format!("expected {} to be a superset of {}", sample, pattern)
                }
                _ => format!("expected {} to include {}", sample, pattern),
            };
            FailureRecord::new("includes", message)
                .with_actual(Some(sample))
                .with_expected(Some(pattern))
        }))
    }

    /// Negation of [`SoftAssert::includes`]. Operands that cannot be
    /// compared fail here as well.
    pub fn not_includes(
        &mut self,
        sample: impl Operand,
        pattern: impl Operand,
    ) -> Result<bool, AssertUsageError> {
        let (sample, pattern) =
            require_pair("notIncludes", "sample and pattern", &sample, &pattern)?;
        let comparison = Comparison::containment_for(sample, pattern);
        let outcome = comparison.evaluate(sample, pattern);
        Ok(self.record(outcome == Some(false), || {
            let message = match (outcome, comparison) {
                (None, _) => not_comparable(sample, pattern),
                (_, Comparison::MemberContainment) => {
                    format!("expected {} to not be a superset of {}", sample, pattern)
                }
                _ => format!("expected {} to not include {}", sample, pattern),
            };
            FailureRecord::new("notIncludes", message)
                .with_actual(Some(sample))
                .with_expected(Some(pattern))
        }))
    }

    pub fn is_undefined(&mut self, value: impl Operand) -> bool {
        let value = value.as_operand();
        self.record(value.is_none(), || {
            let message = format!("expected {} to equal undefined", describe(value));
            FailureRecord::new("isUndefined", message).with_actual(value)
        })
    }

    pub fn is_null(&mut self, value: impl Operand) -> bool {
        let value = value.as_operand();
        self.record(matches!(value, Some(Value::Null)), || {
            FailureRecord::new("isNull", format!("expected {} to be null", describe(value)))
                .with_actual(value)
        })
    }

    /// Passes when the key set of `obj` is exactly `keys`. An empty `keys`
    /// list names no key set and is rejected.
    pub fn object_has_all_keys(
        &mut self,
        obj: impl Operand,
        keys: &[&str],
    ) -> Result<bool, AssertUsageError> {
        let obj = obj.as_operand();
        let map = match obj {
            None | Some(Value::Null) => {
                return Err(usage(AssertUsageError::MissingArgument {
                    operation: "objectHasAllKeys",
                    arguments: "obj and keys",
                }));
            }
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(usage(AssertUsageError::InvalidArgument {
                    operation: "objectHasAllKeys",
                    argument: "obj",
                    expected: "an object",
                    actual: type_name(Some(other)),
                }));
            }
        };
        if keys.is_empty() {
            return Err(usage(AssertUsageError::InvalidArgument {
                operation: "objectHasAllKeys",
                argument: "keys",
                expected: "at least one key",
                actual: "empty list",
            }));
        }

        let passed = map.len() == count_distinct(keys) && keys.iter().all(|k| map.contains_key(*k));
        let expected = Value::from(keys.to_vec());
        Ok(self.record(passed, || {
            let listed = keys.iter().map(|k| format!("'{}'", k)).collect::<Vec<_>>().join(", ");
            let message = format!("expected {} to have keys {}", describe(obj), listed);
            FailureRecord::new("objectHasAllKeys", message)
                .with_actual(obj)
                .with_expected(Some(&expected))
        }))
    }

    /// Passes when `obj` has no own keys. A non-object is logged and still
    /// checked.
    pub fn is_empty_object(&mut self, obj: impl Operand) -> bool {
        let obj = obj.as_operand();
        if !matches!(obj, Some(Value::Object(_))) {
            tracing::warn!("[isEmptyObject] \"obj\" argument is not an object: {}", type_name(obj));
        }
        let count = obj.and_then(own_key_count);
        self.record(count == Some(0), || {
            let message = match count {
                Some(n) => format!("expected {} to have no own keys but got {}", describe(obj), n),
                None => format!("cannot enumerate keys of {}", describe(obj)),
            };
            FailureRecord::new("isEmptyObject", message).with_actual(obj)
        })
    }

    /// Strings, arrays and objects must be non-empty. Numbers and booleans
    /// only need to be present.
    pub fn has_length(&mut self, value: impl Operand) -> Result<bool, AssertUsageError> {
        let value = match value.as_operand() {
            None | Some(Value::Null) => {
                return Err(usage(AssertUsageError::MissingArgument {
                    operation: "hasLength",
                    arguments: "value",
                }));
            }
            Some(v) => v,
        };
        let passed = match value {
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            Value::Number(_) | Value::Bool(_) | Value::Null => true,
        };
        Ok(self.record(passed, || {
            FailureRecord::new("hasLength", format!("expected {} not to be empty", value))
                .with_actual(Some(value))
        }))
    }

    /// Passes when `value` is strictly equal to one of `candidates`.
    pub fn is_one_of(
        &mut self,
        candidates: impl Operand,
        value: impl Operand,
    ) -> Result<bool, AssertUsageError> {
        let value = match value.as_operand() {
            None | Some(Value::Null) => {
                return Err(usage(AssertUsageError::MissingArgument {
                    operation: "isOneOf",
                    arguments: "value",
                }));
            }
            Some(v) => v,
        };
        let candidates = candidates.as_operand();
        let Some(Value::Array(list)) = candidates else {
            return Err(usage(AssertUsageError::InvalidArgument {
                operation: "isOneOf",
                argument: "candidates",
                expected: "an array",
                actual: type_name(candidates),
            }));
        };
        let passed = list.iter().any(|candidate| strict_equals(candidate, value));
        Ok(self.record(passed, || {
            let message = format!("expected {} to be one of {}", value, describe(candidates));
            FailureRecord::new("isOneOf", message)
                .with_actual(Some(value))
                .with_expected(candidates)
        }))
    }

    /// Drain every recorded failure into one aggregate failure.
    ///
    /// No-op when nothing failed. Calling it mid-test is fine: later
    /// primitives start a fresh accumulation.
    pub fn assert_all(&mut self) -> Result<(), AggregateFailure> {
        if self.failed_asserts.is_empty() {
            return Ok(());
        }
        let failures = std::mem::take(&mut self.failed_asserts);
        Err(AggregateFailure { failures })
    }

    /// Like [`SoftAssert::assert_all`] but panics with the aggregate message,
    /// for `#[test]` functions that do not return `Result`.
    #[track_caller]
    pub fn assert_all_or_panic(&mut self) {
        if let Err(aggregate) = self.assert_all() {
            panic!("{}", aggregate);
        }
    }

    /// Failures recorded since the last drain, in occurrence order.
    pub fn failures(&self) -> &[FailureRecord] {
        &self.failed_asserts
    }

    pub fn failure_count(&self) -> usize {
        self.failed_asserts.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed_asserts.is_empty()
    }

    fn record(&mut self, passed: bool, failure: impl FnOnce() -> FailureRecord) -> bool {
        if !passed {
            self.failed_asserts.push(failure());
        }
        passed
    }
}

// ============================================================================
// Argument guards
// ============================================================================

fn require_pair<'a>(
    operation: &'static str,
    arguments: &'static str,
    left: &'a impl Operand,
    right: &'a impl Operand,
) -> Result<(&'a Value, &'a Value), AssertUsageError> {
    match (left.as_operand(), right.as_operand()) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(usage(AssertUsageError::MissingArgument { operation, arguments })),
    }
}

fn usage(error: AssertUsageError) -> AssertUsageError {
    tracing::error!("{}", error);
    error
}

fn not_comparable(sample: &Value, pattern: &Value) -> String {
    format!(
        "cannot check whether {} {} includes {} {}",
        type_name(Some(sample)),
        sample,
        type_name(Some(pattern)),
        pattern
    )
}

fn count_distinct(keys: &[&str]) -> usize {
    let mut seen: Vec<&str> = Vec::with_capacity(keys.len());
    for key in keys {
        if !seen.contains(key) {
            seen.push(*key);
        }
    }
    seen.len()
}
