use thiserror::Error;

/// One or more named values were absent when an operation needed them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{caller}] one or more parameter values are missing: {}", .missing.join(", "))]
pub struct MissingValues {
    pub caller: &'static str,
    pub missing: Vec<&'static str>,
}

/// Presence guard for composite parameters.
///
/// `fields` pairs each field name with whether it holds a value. If any is
/// absent the whole structure is logged and `MissingValues` names the caller
/// and every absent field.
pub fn validate_values(
    caller: &'static str,
    fields: &[(&'static str, bool)],
) -> Result<(), MissingValues> {
    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    tracing::error!(caller, ?fields, "one or more parameter values are missing");
    Err(MissingValues { caller, missing })
}
