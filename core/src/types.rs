//! Shared primitive types used across every table.

/// An opaque, table-unique identifier (hyphenated UUID text).
pub type EntityId = String;

/// Parent reference written into every orphan account row.
pub const ORPHAN_CUSTOMER_ID: &str = "INVALID_CUSTOMER_ID";

/// How a row came to be in its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowOrigin {
    /// Built by the synthesize → corrupt pipeline.
    Primary,
    /// Verbatim copy of an earlier primary row.
    Duplicate,
    /// Nominal row whose parent reference is the orphan sentinel.
    Orphan,
}

