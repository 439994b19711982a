//! One batch run: parse records, apply storage rules, render the result.

use anyhow::{Context, Result, bail};
use serde_json::Value as JsonValue;

use stowage_storage::{StorageConstraints, parse_records, plan_storage};

/// Summary of a batch run, logged by the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub received: usize,
    pub admitted: usize,
    pub rejected: usize,
    pub total_weight: f64,
    pub weight_utilization: Option<f64>,
    pub volume_utilization: Option<f64>,
}

/// Apply storage rules to a JSON array of product records.
///
/// Returns the admitted records (verbatim, in final order) as pretty JSON.
pub fn run(input: &str, constraints: &JsonValue) -> Result<(String, RunSummary)> {
    let constraints = StorageConstraints::from_json(constraints)?;

    let document: JsonValue =
        serde_json::from_str(input).context("product input is not valid JSON")?;
    let JsonValue::Array(records) = document else {
        bail!("product input must be a JSON array of records");
    };

    let products = parse_records(&records)?;
    let plan = plan_storage(&products, &constraints);

    let summary = RunSummary {
        received: records.len(),
        admitted: plan.admitted().len(),
        rejected: plan.rejected().len(),
        total_weight: plan.total_weight().value(),
        weight_utilization: plan.weight_utilization(),
        volume_utilization: plan.volume_utilization(),
    };

    let output = serde_json::to_string_pretty(&plan.select(&records))
        .context("failed to render filtered records")?;

    Ok((output, summary))
}
