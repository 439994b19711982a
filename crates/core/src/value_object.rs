//! Value object trait: equality by value, not identity.
//!
//! Value objects are defined entirely by their attribute values. Two value objects
//! with the same values are considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// construct a new one; constructors are the single place where validation runs,
/// so a value that exists is a value that is valid.
///
/// The trait requires:
/// - **Clone**: value objects are cheap to copy
/// - **PartialEq**: compared by attribute values
/// - **Debug**: usable in logs and test assertions
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Weight(f64);
///
/// impl ValueObject for Weight {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
