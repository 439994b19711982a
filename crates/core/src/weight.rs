//! Physical weight of a stored item.

use core::ops::Add;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::ValueObject;

/// Non-negative, finite weight (unit-agnostic; the dispatch tool uses pounds).
///
/// Finite and non-negative weights are what make the cumulative capacity check
/// sound: a running total can only grow as items are admitted.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Weight(f64);

impl Weight {
    pub const ZERO: Weight = Weight(0.0);

    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::validation(format!(
                "weight must be a finite number (got {value})"
            )));
        }
        if value < 0.0 {
            return Err(DomainError::validation(format!(
                "weight must be non-negative (got {value})"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl ValueObject for Weight {}

impl Default for Weight {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Weight {
    type Output = Weight;

    /// Saturates at `f64::MAX` so the result stays finite.
    fn add(self, rhs: Weight) -> Weight {
        Weight((self.0 + rhs.0).min(f64::MAX))
    }
}

impl core::iter::Sum for Weight {
    fn sum<I: Iterator<Item = Weight>>(iter: I) -> Self {
        iter.fold(Weight::ZERO, Add::add)
    }
}

impl TryFrom<f64> for Weight {
    type Error = DomainError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Weight> for f64 {
    fn from(value: Weight) -> Self {
        value.0
    }
}

impl core::fmt::Display for Weight {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
