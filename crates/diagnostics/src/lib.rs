//! Diagnostics for boxlabel.
//!
//! Provides [`Diagnostic`], [`Severity`] and [`Origin`] types used to report
//! errors, warnings, and informational messages from the manifest parser,
//! inventory resolver and record aggregator. Diagnostic codes are defined in
//! the [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error; the run cannot produce output.
    Error,
    /// Data was skipped or ignored.
    Warn,
    /// Informational note.
    Info,
}

/// Input table a diagnostic points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    /// The box manifest.
    Manifest,
    /// The inventory-to-location table.
    Inventory,
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Table::Manifest => write!(f, "manifest"),
            Table::Inventory => write!(f, "inventory"),
        }
    }
}

/// Position of the offending data in one of the input tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Origin {
    /// Which table.
    pub table: Table,
    /// 1-based data row (the header row is not counted).
    pub row: usize,
}

impl Origin {
    /// A manifest row.
    pub fn manifest(row: usize) -> Self {
        Self {
            table: Table::Manifest,
            row,
        }
    }

    /// An inventory row.
    pub fn inventory(row: usize) -> Self {
        Self {
            table: Table::Inventory,
            row,
        }
    }
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} row {}", self.table, self.row)
    }
}

/// A diagnostic message produced while building the record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"BXL2001"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Optional input row this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
    /// Machine-readable context for tooling. Keys and values are free-form strings.
    /// Absent when no context is applicable. Serialized only when present.
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// Create a diagnostic with the given fields.
    pub fn new(
        id: impl Into<Cow<'static, str>>,
        severity: Severity,
        message: impl Into<String>,
        origin: Option<Origin>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            message: message.into(),
            origin,
            context: None,
        }
    }

    /// Shorthand for an `Error` diagnostic.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        origin: Option<Origin>,
    ) -> Self {
        Self::new(id, Severity::Error, message, origin)
    }

    /// Shorthand for a `Warn` diagnostic.
    pub fn warn(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        origin: Option<Origin>,
    ) -> Self {
        Self::new(id, Severity::Warn, message, origin)
    }

    /// Shorthand for an `Info` diagnostic.
    pub fn info(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        origin: Option<Origin>,
    ) -> Self {
        Self::new(id, Severity::Info, message, origin)
    }

    /// Attach machine-readable context metadata (builder pattern).
    ///
    /// Keys are short descriptors like `"sku"`, `"item"`, `"first"`.
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// `true` for error-severity diagnostics.
    pub fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warn => write!(f, "warn"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)?;
        if let Some(origin) = &self.origin {
            write!(f, " ({origin})")?;
        }
        Ok(())
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    let text = match id {
        codes::MALFORMED_ITEM => {
            "A SKU-list item must read `<quantity> x <sku>`: a positive whole quantity, \
             the separator `x` (or `X`, `×`), then a non-empty SKU. Items are separated by `;`."
        }
        codes::DUPLICATE_BOX_SKU => {
            "The same SKU is listed more than once for one box number. The quantities are \
             summed into the first record so every box lists each SKU once. The normalized \
             table keeps only that record's row; the `rows` context lists every row merged."
        }
        codes::CONFLICTING_LOCATION => {
            "The inventory table assigns two different location codes to the same SKU. \
             Each SKU must resolve to exactly one location; fix the inventory and rerun."
        }
        codes::MISSING_LOCATION => {
            "The manifest references a SKU that has no row in the inventory table, so no \
             location code can be printed for it."
        }
        codes::INCOMPLETE_INVENTORY_ROW => {
            "An inventory row has a SKU but no location code, or a location code but no SKU. \
             The row was ignored."
        }
        codes::EMPTY_INPUT => {
            "The manifest produced no box items, or the inventory table has no usable rows. \
             Nothing was generated."
        }
        _ => return None,
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warn), "warn");
        assert_eq!(format!("{}", Severity::Info), "info");
    }

    #[test]
    fn diagnostic_error_constructor() {
        let d = Diagnostic::error(codes::MISSING_LOCATION, "SKU C has no location", None);
        assert_eq!(d.id, "BXL2002");
        assert_eq!(d.severity, Severity::Error);
        assert!(d.is_error());
        assert!(d.origin.is_none());
    }

    #[test]
    fn diagnostic_warn_constructor() {
        let d = Diagnostic::warn(codes::MALFORMED_ITEM, "bad item", Some(Origin::manifest(3)));
        assert_eq!(d.severity, Severity::Warn);
        assert!(!d.is_error());
        assert_eq!(d.origin, Some(Origin::manifest(3)));
    }

    #[test]
    fn diagnostic_display_with_origin() {
        let d = Diagnostic::error(codes::MALFORMED_ITEM, "bad item", Some(Origin::manifest(2)));
        assert_eq!(format!("{d}"), "error[BXL1001]: bad item (manifest row 2)");
    }

    #[test]
    fn diagnostic_display_without_origin() {
        let d = Diagnostic::info(codes::DUPLICATE_BOX_SKU, "folded", None);
        assert_eq!(format!("{d}"), "info[BXL1002]: folded");
    }

    #[test]
    fn diagnostic_explain_unknown() {
        let d = Diagnostic::error("UNKNOWN_CODE", "test", None);
        assert!(d.explain().is_none());
    }

    #[test]
    fn all_codes_have_explanations() {
        for code in codes::ALL {
            assert!(
                explain(code).is_some(),
                "diagnostic code {code} has no explain() entry"
            );
        }
    }

    #[test]
    fn diagnostic_serde_omits_none_fields() {
        let d = Diagnostic::error(codes::EMPTY_INPUT, "empty", None);
        let json = serde_json::to_string(&d).unwrap();
        assert!(!json.contains("origin"), "None origin should be omitted: {json}");
        assert!(!json.contains("context"), "None context should be omitted: {json}");
    }

    #[test]
    fn diagnostic_context_serde_roundtrip() {
        let d = Diagnostic::error(
            codes::CONFLICTING_LOCATION,
            "conflict",
            Some(Origin::inventory(7)),
        )
        .with_context(BTreeMap::from([
            ("sku".into(), "A".into()),
            ("first".into(), "X1".into()),
            ("second".into(), "X2".into()),
        ]));
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains(r#""table":"inventory""#), "{json}");
        let d2: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(d, d2);
    }

    #[test]
    fn diagnostic_context_deterministic_order() {
        let d = Diagnostic::error(codes::CONFLICTING_LOCATION, "test", None).with_context(
            BTreeMap::from([
                ("sku".into(), "1".into()),
                ("first".into(), "2".into()),
                ("second".into(), "3".into()),
            ]),
        );
        let json = serde_json::to_string(&d).unwrap();
        let first = json.find("first").unwrap();
        let second = json.find("second").unwrap();
        let sku = json.find("\"sku\"").unwrap();
        assert!(
            first < second && second < sku,
            "BTreeMap should serialize in alphabetical key order: {json}"
        );
    }
}
