//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "modify" one, build a new value (e.g. `Money::checked_add` returns a new
/// amount rather than mutating in place).
///
/// - **Value Object**: `Money(829_999)`, a `BillItem` snapshot
/// - **Entity**: a catalog `Product` (same id means same product)
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
