//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic data and configuration failures. Errors are
/// always returned to the caller; nothing in the domain layer logs and swallows them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a negative weight).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A product record could not be interpreted.
    ///
    /// `index` is the zero-based position of the record in the caller's input.
    #[error("invalid record at position {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    /// A recognized constraint option carried an unusable value.
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_record(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidRecord {
            index,
            reason: reason.into(),
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Position of the offending record, if this error concerns one.
    pub fn record_index(&self) -> Option<usize> {
        match self {
            Self::InvalidRecord { index, .. } => Some(*index),
            _ => None,
        }
    }
}
