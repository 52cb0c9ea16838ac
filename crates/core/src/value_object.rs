//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values; they
/// have no identity of their own. `PersonProfile` is a value object, while
/// `Customer` (which embeds one) is an entity.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
