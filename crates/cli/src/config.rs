//! Constraint configuration for batch runs.
//!
//! Constraints are read from an optional JSON file (`STOWAGE_CONSTRAINTS_FILE`)
//! and then overridden key by key from environment variables.

use anyhow::Context;
use serde_json::{Map, Number, Value as JsonValue};

use stowage_core::{DomainError, DomainResult};
use stowage_storage::constraints::{FRAGILE_ON_TOP_KEY, MAX_STORAGE_WEIGHT_KEY, PRIORITY_FIRST_KEY};

pub const CONSTRAINTS_FILE_ENV: &str = "STOWAGE_CONSTRAINTS_FILE";
pub const MAX_STORAGE_WEIGHT_ENV: &str = "STOWAGE_MAX_STORAGE_WEIGHT";
pub const PRIORITY_FIRST_ENV: &str = "STOWAGE_PRIORITY_FIRST";
pub const FRAGILE_ON_TOP_ENV: &str = "STOWAGE_FRAGILE_ON_TOP";

/// Resolve constraints for a run, reading `STOWAGE_CONSTRAINTS_FILE` when it is set.
///
/// An empty file variable counts as unset, like every other variable here.
pub fn load_constraints(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<JsonValue> {
    let file_contents = match lookup(CONSTRAINTS_FILE_ENV).filter(|v| !v.trim().is_empty()) {
        Some(path) => Some(
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read constraints file {path}"))?,
        ),
        None => None,
    };

    Ok(resolve_constraints(file_contents.as_deref(), &lookup)?)
}

/// Merge file-provided constraints with environment overrides.
///
/// `lookup` resolves environment variables; empty values count as unset. The
/// result is the loosely-typed mapping `StorageConstraints::from_json` validates.
pub fn resolve_constraints(
    file_contents: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> DomainResult<JsonValue> {
    let mut options = match file_contents {
        None => Map::new(),
        Some(raw) => match serde_json::from_str::<JsonValue>(raw) {
            Ok(JsonValue::Object(map)) => map,
            Ok(_) => {
                return Err(DomainError::configuration(
                    "constraints file must contain a JSON object",
                ));
            }
            Err(e) => {
                return Err(DomainError::configuration(format!(
                    "constraints file is not valid JSON: {e}"
                )));
            }
        },
    };

    let env_value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(raw) = env_value(MAX_STORAGE_WEIGHT_ENV) {
        options.insert(MAX_STORAGE_WEIGHT_KEY.to_string(), parse_cap(&raw)?);
    }
    if let Some(raw) = env_value(PRIORITY_FIRST_ENV) {
        options.insert(
            PRIORITY_FIRST_KEY.to_string(),
            JsonValue::Bool(parse_bool(PRIORITY_FIRST_ENV, &raw)?),
        );
    }
    if let Some(raw) = env_value(FRAGILE_ON_TOP_ENV) {
        options.insert(
            FRAGILE_ON_TOP_KEY.to_string(),
            JsonValue::Bool(parse_bool(FRAGILE_ON_TOP_ENV, &raw)?),
        );
    }

    Ok(JsonValue::Object(options))
}

fn parse_cap(raw: &str) -> DomainResult<JsonValue> {
    let trimmed = raw.trim();
    if matches!(trimmed.to_ascii_lowercase().as_str(), "inf" | "infinity" | "none" | "unbounded") {
        return Ok(JsonValue::Null);
    }
    let value: f64 = trimmed.parse().map_err(|_| {
        DomainError::configuration(format!("{MAX_STORAGE_WEIGHT_ENV} is not a number: {raw:?}"))
    })?;
    Number::from_f64(value).map(JsonValue::Number).ok_or_else(|| {
        DomainError::configuration(format!("{MAX_STORAGE_WEIGHT_ENV} must be finite: {raw:?}"))
    })
}

fn parse_bool(name: &str, raw: &str) -> DomainResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(DomainError::configuration(format!(
            "{name} must be a boolean, got {raw:?}"
        ))),
    }
}
