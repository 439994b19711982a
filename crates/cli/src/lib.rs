//! `stowage-cli` — batch entry point for storage rules.
//!
//! Reads product records as JSON, applies the configured storage constraints and
//! writes the surviving records back out. Parsing CSV exports into JSON is left
//! to the surrounding pipeline.

pub mod config;
pub mod run;

pub use config::{load_constraints, resolve_constraints};
pub use run::{RunSummary, run};
