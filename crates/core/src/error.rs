//! Typed problems and the run-level error.
//!
//! Validation problems are collected in batches: a stage records every
//! problem it finds before giving up, and [`PipelineError`] carries the
//! whole list so the user can fix all of them in one pass.

use std::collections::BTreeMap;

use boxlabel_diagnostics::{Diagnostic, Origin, Severity, Table, codes};

/// Why a single SKU-list item failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ItemError {
    /// No `x` separator between quantity and SKU.
    #[error("missing `x` separator between quantity and SKU")]
    MissingSeparator,
    /// Nothing before the separator.
    #[error("quantity is empty")]
    EmptyQuantity,
    /// The quantity is not a whole number (or does not fit in 32 bits).
    #[error("quantity `{0}` is not a whole number")]
    InvalidQuantity(String),
    /// The quantity is zero.
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    /// Nothing after the separator.
    #[error("SKU is empty")]
    EmptySku,
}

/// A manifest item that does not read `<quantity> x <sku>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedItem {
    /// 1-based manifest row.
    pub row: usize,
    /// Raw item text as found between `;` separators.
    pub item: String,
    /// Parse failure.
    pub reason: ItemError,
}

/// One SKU mapped to two different locations by the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictingLocation {
    /// The SKU.
    pub sku: String,
    /// Location code from the first row mentioning the SKU.
    pub first_code: String,
    /// The differing location code.
    pub second_code: String,
    /// 1-based inventory row holding `second_code`.
    pub row: usize,
}

/// A manifest SKU without an inventory location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingLocation {
    /// The SKU.
    pub sku: String,
}

/// A reason the run produced no output.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Problem {
    /// See [`MalformedItem`].
    MalformedItem(MalformedItem),
    /// See [`ConflictingLocation`].
    ConflictingLocation(ConflictingLocation),
    /// See [`MissingLocation`].
    MissingLocation(MissingLocation),
    /// The table has no usable rows.
    EmptyInput(Table),
}

impl MalformedItem {
    /// Convert to a diagnostic at the given severity.
    pub fn to_diagnostic(&self, severity: Severity) -> Diagnostic {
        Diagnostic::new(
            codes::MALFORMED_ITEM,
            severity,
            format!("malformed SKU item `{}`: {}", self.item, self.reason),
            Some(Origin::manifest(self.row)),
        )
        .with_context(BTreeMap::from([
            ("item".into(), self.item.clone()),
            ("reason".into(), self.reason.to_string()),
        ]))
    }
}

impl Problem {
    /// Convert to an error diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Problem::MalformedItem(m) => m.to_diagnostic(Severity::Error),
            Problem::ConflictingLocation(c) => Diagnostic::error(
                codes::CONFLICTING_LOCATION,
                format!(
                    "SKU {} has multiple location codes: '{}' and '{}'",
                    c.sku, c.first_code, c.second_code
                ),
                Some(Origin::inventory(c.row)),
            )
            .with_context(BTreeMap::from([
                ("sku".into(), c.sku.clone()),
                ("first".into(), c.first_code.clone()),
                ("second".into(), c.second_code.clone()),
            ])),
            Problem::MissingLocation(m) => Diagnostic::error(
                codes::MISSING_LOCATION,
                format!("SKU {} is not in the inventory table", m.sku),
                None,
            )
            .with_context(BTreeMap::from([("sku".into(), m.sku.clone())])),
            Problem::EmptyInput(table) => Diagnostic::error(
                codes::EMPTY_INPUT,
                format!("{table} table has no usable rows"),
                None,
            )
            .with_context(BTreeMap::from([("table".into(), table.to_string())])),
        }
    }
}

/// The run was aborted; no records or labels were produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} problem(s) found; no output was produced", problems.len())]
pub struct PipelineError {
    problems: Vec<Problem>,
}

impl PipelineError {
    /// Wrap a non-empty problem list.
    pub fn new(problems: Vec<Problem>) -> Self {
        debug_assert!(!problems.is_empty(), "PipelineError without problems");
        Self { problems }
    }

    /// Abort because a table is empty.
    pub fn empty(table: Table) -> Self {
        Self::new(vec![Problem::EmptyInput(table)])
    }

    /// All problems, in the order they were found.
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Consume the error, yielding its problems.
    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }

    /// Malformed manifest items.
    pub fn malformed_items(&self) -> impl Iterator<Item = &MalformedItem> {
        self.problems.iter().filter_map(|p| match p {
            Problem::MalformedItem(m) => Some(m),
            _ => None,
        })
    }

    /// Inventory conflicts.
    pub fn conflicts(&self) -> impl Iterator<Item = &ConflictingLocation> {
        self.problems.iter().filter_map(|p| match p {
            Problem::ConflictingLocation(c) => Some(c),
            _ => None,
        })
    }

    /// Manifest SKUs with no location.
    pub fn missing(&self) -> impl Iterator<Item = &MissingLocation> {
        self.problems.iter().filter_map(|p| match p {
            Problem::MissingLocation(m) => Some(m),
            _ => None,
        })
    }

    /// Every problem as an error diagnostic.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.problems.iter().map(Problem::to_diagnostic).collect()
    }

    /// Append the problems of a later, independent stage.
    pub(crate) fn merge(mut self, later: Self) -> Self {
        self.problems.extend(later.problems);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_diagnostic_carries_both_codes() {
        let d = Problem::ConflictingLocation(ConflictingLocation {
            sku: "A".into(),
            first_code: "X1".into(),
            second_code: "X2".into(),
            row: 2,
        })
        .to_diagnostic();
        assert_eq!(d.id, codes::CONFLICTING_LOCATION);
        assert_eq!(d.message, "SKU A has multiple location codes: 'X1' and 'X2'");
        assert_eq!(d.origin, Some(Origin::inventory(2)));
        let ctx = d.context.unwrap();
        assert_eq!(ctx["first"], "X1");
        assert_eq!(ctx["second"], "X2");
    }

    #[test]
    fn malformed_item_keeps_requested_severity() {
        let item = MalformedItem {
            row: 4,
            item: "abc".into(),
            reason: ItemError::MissingSeparator,
        };
        assert_eq!(item.to_diagnostic(Severity::Warn).severity, Severity::Warn);
        assert!(Problem::MalformedItem(item).to_diagnostic().is_error());
    }

    #[test]
    fn merge_keeps_stage_order() {
        let a = PipelineError::empty(Table::Manifest);
        let b = PipelineError::empty(Table::Inventory);
        let merged = a.merge(b);
        assert_eq!(
            merged.problems(),
            &[
                Problem::EmptyInput(Table::Manifest),
                Problem::EmptyInput(Table::Inventory)
            ]
        );
    }

    #[test]
    fn display_counts_problems() {
        let err = PipelineError::new(vec![
            Problem::MissingLocation(MissingLocation { sku: "C".into() }),
            Problem::MissingLocation(MissingLocation { sku: "D".into() }),
        ]);
        assert_eq!(err.to_string(), "2 problem(s) found; no output was produced");
        assert_eq!(err.missing().count(), 2);
        assert_eq!(err.diagnostics().len(), 2);
    }
}
