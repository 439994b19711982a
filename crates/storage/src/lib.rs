//! Storage rules for warehouse product lists.
//!
//! This crate decides which products fit a storage area and in which order they
//! should be placed, implemented purely as deterministic domain logic (no IO, no
//! CSV, no presentation). It is a linear filter-and-sort pass, not a packing or
//! routing optimizer.

pub mod constraints;
pub mod product;
pub mod rules;

pub use constraints::StorageConstraints;
pub use product::{Priority, Product, is_truthy_flag, parse_records};
pub use rules::{StoragePlan, apply_rules, apply_rules_to_records, plan_storage};
