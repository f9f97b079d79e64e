use serde_json::{Number, Value};

// ============================================================================
// Comparison variants
// ============================================================================

/// The closed set of comparisons the soft-assert primitives are built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Same JSON type and same value. Numbers compare by value, so `5`
    /// equals `5.0` but never `"5"`.
    StrictEquality,
    /// Structural equality over nested arrays and objects.
    DeepEquality,
    /// Every pattern element is strictly equal to some sample element.
    MemberContainment,
    /// Substring, array element, or object subset containment.
    StructuralContainment,
}

impl Comparison {
    /// Pick the containment variant from the operand type tags.
    ///
    /// Two arrays use member containment; every other pairing uses
    /// structural containment.
    pub fn containment_for(sample: &Value, pattern: &Value) -> Self {
        if sample.is_array() && pattern.is_array() {
            Comparison::MemberContainment
        } else {
            Comparison::StructuralContainment
        }
    }

    /// Evaluate this comparison.
    ///
    /// Returns `None` when the operands cannot be compared this way
    /// (e.g. structural containment on a number).
    pub fn evaluate(self, left: &Value, right: &Value) -> Option<bool> {
        match self {
            Comparison::StrictEquality => Some(strict_equals(left, right)),
            Comparison::DeepEquality => Some(deep_equals(left, right)),
            Comparison::MemberContainment => includes_members(left, right),
            Comparison::StructuralContainment => structurally_includes(left, right),
        }
    }
}

// ============================================================================
// Equality
// ============================================================================

/// Decoded JSON carries no reference identity, so strict equality walks
/// composites the same way deep equality does. Types must match at every
/// level and numbers compare by value.
pub fn strict_equals(left: &Value, right: &Value) -> bool {
    deep_equals(left, right)
}

pub fn deep_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| deep_equals(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(key, x)| b.get(key).is_some_and(|y| deep_equals(x, y)))
        }
        _ => left == right,
    }
}

/// Integers compare exactly; anything involving a float compares as `f64`.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x == y;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

// ============================================================================
// Containment
// ============================================================================

fn includes_members(sample: &Value, pattern: &Value) -> Option<bool> {
    let (Value::Array(haystack), Value::Array(needles)) = (sample, pattern) else {
        return None;
    };
    Some(
        needles
            .iter()
            .all(|needle| haystack.iter().any(|item| strict_equals(item, needle))),
    )
}

fn structurally_includes(sample: &Value, pattern: &Value) -> Option<bool> {
    match (sample, pattern) {
        (Value::String(haystack), Value::String(needle)) => {
            Some(haystack.contains(needle.as_str()))
        }
        (Value::Array(items), needle) => Some(items.iter().any(|item| deep_equals(item, needle))),
        (Value::Object(haystack), Value::Object(needle)) => {
            Some(needle.iter().all(|(key, expected)| {
                haystack
                    .get(key)
                    .is_some_and(|actual| deep_equals(actual, expected))
            }))
        }
        _ => None,
    }
}

// ============================================================================
// Helpers shared by the primitives
// ============================================================================

/// Number of own enumerable keys, or `None` for null.
///
/// Objects count entries, arrays count elements, strings count characters,
/// numbers and booleans have none.
pub fn own_key_count(value: &Value) -> Option<usize> {
    match value {
        Value::Null => None,
        Value::Object(map) => Some(map.len()),
        Value::Array(items) => Some(items.len()),
        Value::String(s) => Some(s.chars().count()),
        Value::Bool(_) | Value::Number(_) => Some(0),
    }
}

/// Short type tag used in failure messages.
pub fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}

/// Render an operand for a failure message.
pub fn describe(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_string(),
        Some(v) => v.to_string(),
    }
}
