//! Trait for types that have OIDs with conventional names

/// Trait for types whose OID may have a conventional short name
///
/// For example, the attribute type `2.5.4.3` is conventionally written `cn`.
pub trait OidName {
    /// Returns the conventional name for this type's OID, if it has one
    fn oid_name(&self) -> Option<&'static str>;
}
