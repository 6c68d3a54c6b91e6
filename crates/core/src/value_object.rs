//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two with the
/// same attribute values are the same value. To "modify" one, build a new
/// one. The application snapshot embedded in a registration request is the
/// canonical example here: it is written once and never changes.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
