//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. Every code has an entry in [`crate::explain`].

// ── Manifest (1xxx) ─────────────────────────────────────────────────────

/// A SKU-list item does not parse as `<quantity> x <sku>`.
pub const MALFORMED_ITEM: &str = "BXL1001";
/// A SKU appears more than once for the same box; quantities were summed.
pub const DUPLICATE_BOX_SKU: &str = "BXL1002";

// ── Inventory (2xxx) ────────────────────────────────────────────────────

/// The inventory maps one SKU to two different location codes.
pub const CONFLICTING_LOCATION: &str = "BXL2001";
/// A SKU referenced by the manifest has no inventory location.
pub const MISSING_LOCATION: &str = "BXL2002";
/// An inventory row has a SKU without a location, or the reverse.
pub const INCOMPLETE_INVENTORY_ROW: &str = "BXL2003";

// ── Input (3xxx) ────────────────────────────────────────────────────────

/// The manifest or inventory table has no usable rows.
pub const EMPTY_INPUT: &str = "BXL3001";

/// Every code defined above, in numeric order.
pub const ALL: &[&str] = &[
    MALFORMED_ITEM,
    DUPLICATE_BOX_SKU,
    CONFLICTING_LOCATION,
    MISSING_LOCATION,
    INCOMPLETE_INVENTORY_ROW,
    EMPTY_INPUT,
];
