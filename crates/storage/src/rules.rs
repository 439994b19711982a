//! Storage rule pass: greedy weight admission followed by optional stable reorders.
//!
//! The pass is deliberately linear. Admission walks products once in input order;
//! a product that would push the running total over the cap is rejected for good,
//! even if a later, lighter product would have fit in its place.

use serde_json::Value as JsonValue;

use stowage_core::{DomainResult, Weight};

use crate::constraints::StorageConstraints;
use crate::product::{Product, parse_records};

/// Outcome of a rule pass.
#[derive(Debug, Clone, PartialEq)]
pub struct StoragePlan {
    products: Vec<Product>,
    admitted: Vec<usize>,
    rejected: Vec<usize>,
    total_weight: Weight,
    max_storage_weight: Option<Weight>,
    total_volume: Option<f64>,
    storage_volume: Option<f64>,
}

impl StoragePlan {
    /// Admitted products in final order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn into_products(self) -> Vec<Product> {
        self.products
    }

    /// Input positions of admitted products, in final order.
    pub fn admitted(&self) -> &[usize] {
        &self.admitted
    }

    /// Input positions of rejected products, in input order.
    pub fn rejected(&self) -> &[usize] {
        &self.rejected
    }

    pub fn total_weight(&self) -> Weight {
        self.total_weight
    }

    pub fn max_storage_weight(&self) -> Option<Weight> {
        self.max_storage_weight
    }

    /// Percentage of the cap used by admitted products.
    ///
    /// `None` when there is no cap or the cap is zero.
    pub fn weight_utilization(&self) -> Option<f64> {
        let max = self.max_storage_weight?.value();
        if max <= 0.0 {
            return None;
        }
        Some(self.total_weight.value() / max * 100.0)
    }

    /// Combined volume of admitted products.
    ///
    /// `None` if any admitted product lacks numeric `Length`/`Width`/`Height`.
    pub fn total_volume(&self) -> Option<f64> {
        self.total_volume
    }

    /// Percentage of the storage area volume used by admitted products.
    ///
    /// `None` when the storage dimensions or a product's dimensions are unknown,
    /// or the storage volume is zero. Informational only: admission never looks at
    /// volume.
    pub fn volume_utilization(&self) -> Option<f64> {
        let capacity = self.storage_volume?;
        if capacity <= 0.0 {
            return None;
        }
        Some(self.total_volume? / capacity * 100.0)
    }

    /// Pick items of a parallel slice (e.g. the raw records) in final order.
    pub fn select<'a, T>(&self, items: &'a [T]) -> Vec<&'a T> {
        self.admitted.iter().filter_map(|&i| items.get(i)).collect()
    }
}

/// Run the rule pass and keep the bookkeeping.
///
/// 1. Admit products in input order while `total + weight <= max_storage_weight`.
/// 2. If `priority_first`, stable-sort by priority rank (High, Medium/unknown, Low).
/// 3. If `fragile_on_top`, stable-sort fragile products first.
pub fn plan_storage(products: &[Product], constraints: &StorageConstraints) -> StoragePlan {
    let mut admitted: Vec<usize> = Vec::with_capacity(products.len());
    let mut rejected: Vec<usize> = Vec::new();
    let mut total = Weight::ZERO;

    for (index, product) in products.iter().enumerate() {
        let weight = product.weight();
        if constraints.admits(total, weight) {
            admitted.push(index);
            total = total + weight;
        } else {
            tracing::trace!(index, weight = weight.value(), "product rejected by weight cap");
            rejected.push(index);
        }
    }

    // `sort_by_key` is stable; order within equal keys is the admission order.
    if constraints.priority_first() {
        admitted.sort_by_key(|&i| products[i].priority_rank());
    }
    if constraints.fragile_on_top() {
        admitted.sort_by_key(|&i| !products[i].is_fragile());
    }

    tracing::debug!(
        admitted = admitted.len(),
        rejected = rejected.len(),
        total_weight = total.value(),
        max_storage_weight = constraints.max_storage_weight().map(Weight::value),
        "storage rules applied"
    );

    let total_volume = admitted
        .iter()
        .map(|&i| products[i].volume())
        .sum::<Option<f64>>();

    StoragePlan {
        products: admitted.iter().map(|&i| products[i].clone()).collect(),
        admitted,
        rejected,
        total_weight: total,
        max_storage_weight: constraints.max_storage_weight(),
        total_volume,
        storage_volume: constraints.storage_volume(),
    }
}

/// Filter and order products under the given storage constraints.
pub fn apply_rules(products: &[Product], constraints: &StorageConstraints) -> Vec<Product> {
    plan_storage(products, constraints).into_products()
}

/// Apply storage rules to loosely-typed records.
///
/// Constraints are validated first, then every record. The returned records are
/// clones of the inputs, untouched, in final order.
pub fn apply_rules_to_records(
    records: &[JsonValue],
    constraints: &JsonValue,
) -> DomainResult<Vec<JsonValue>> {
    let constraints = StorageConstraints::from_json(constraints)?;
    let products = parse_records(records)?;
    let plan = plan_storage(&products, &constraints);
    Ok(plan.select(records).into_iter().cloned().collect())
}
