//! Shared fixtures for `boxlabel_core` integration tests.

#![allow(unreachable_pub)]

use boxlabel_core::{
    Aggregate, Diagnostic, InventoryRow, ManifestRow, PipelineConfig, PipelineOutput, run,
};

// ─── Table builders ──────────────────────────────────────────────────────────

/// Manifest rows from `(box_number, sku_list)` pairs.
#[allow(dead_code)]
pub fn manifest(rows: &[(&str, &str)]) -> Vec<ManifestRow> {
    rows.iter()
        .map(|(b, list)| ManifestRow::new(*b, *list))
        .collect()
}

/// Inventory rows from `(sku, location_code)` pairs.
#[allow(dead_code)]
pub fn inventory(rows: &[(&str, &str)]) -> Vec<InventoryRow> {
    rows.iter()
        .map(|(sku, code)| InventoryRow::new(*sku, *code))
        .collect()
}

// ─── Pipeline helpers ────────────────────────────────────────────────────────

/// Run with the default configuration, panicking on failure.
#[allow(dead_code)]
pub fn run_ok(m: &[(&str, &str)], i: &[(&str, &str)]) -> PipelineOutput {
    run(&manifest(m), &inventory(i), &PipelineConfig::default())
        .unwrap_or_else(|e| panic!("pipeline failed: {e}: {:?}", e.problems()))
}

/// Aggregate only.
#[allow(dead_code)]
pub fn aggregate_ok(m: &[(&str, &str)], i: &[(&str, &str)]) -> Aggregate {
    run_ok(m, i).aggregate
}

/// The single-box scenario used across tests.
#[allow(dead_code)]
pub fn box001() -> Aggregate {
    aggregate_ok(
        &[("BOX001", "20 x 4669059408; 9 x 4669069408")],
        &[("4669059408", "A123"), ("4669069408", "B7")],
    )
}

/// A shipment with interleaved boxes and a repeated SKU across boxes.
#[allow(dead_code)]
pub fn interleaved() -> Aggregate {
    aggregate_ok(
        &[
            ("ZZ-9", "1 x S1; 2 x S2"),
            ("AA-1", "3 x S2"),
            ("ZZ-9", "4 x S3"),
            ("MM-5", "5 x S4; 6 x S1; 7 x S5"),
        ],
        &[
            ("S1", "A1"),
            ("S2", "B22"),
            ("S3", "C333"),
            ("S4", "9Z"),
            ("S5", "DOCK"),
        ],
    )
}

// ─── Diagnostic helpers ──────────────────────────────────────────────────────

/// Find first diagnostic with the given code.
#[allow(dead_code)]
pub fn find_diag<'a>(issues: &'a [Diagnostic], code: &str) -> &'a Diagnostic {
    issues
        .iter()
        .find(|d| &*d.id == code)
        .unwrap_or_else(|| panic!("expected diagnostic {code}"))
}
