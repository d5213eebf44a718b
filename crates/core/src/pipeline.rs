//! Pipeline orchestration: parser, resolver and aggregator in sequence.
//!
//! The manifest and the inventory are validated independently so that a
//! single failed run reports the problems of both tables.

use serde::{Deserialize, Serialize};

use boxlabel_diagnostics::{Diagnostic, Severity};
use boxlabel_profile::LabelProfile;

use crate::aggregate::{Aggregate, aggregate};
use crate::assemble::{
    LabelDocument, book_document, box_summary_documents, single_label_documents,
};
use crate::error::PipelineError;
use crate::inventory::resolve_inventory;
use crate::manifest::{MalformedItemPolicy, parse_manifest};
use crate::table::{InventoryRow, ManifestRow};

/// Run options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Handling of manifest items that do not parse.
    #[serde(default)]
    pub malformed_items: MalformedItemPolicy,
}

/// A completed run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Aggregated records.
    pub aggregate: Aggregate,
    /// Non-fatal diagnostics from every stage, in stage order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse, resolve and aggregate.
///
/// Either every record is produced or nothing is: on failure the error
/// carries every problem found in both tables.
pub fn run(
    manifest: &[ManifestRow],
    inventory: &[InventoryRow],
    config: &PipelineConfig,
) -> Result<PipelineOutput, PipelineError> {
    let parsed = parse_manifest(manifest, config.malformed_items);
    let resolved = resolve_inventory(inventory);

    let (parsed, resolved) = match (parsed, resolved) {
        (Ok(p), Ok(r)) => (p, r),
        (Err(e), Ok(_)) | (Ok(_), Err(e)) => return Err(e),
        (Err(manifest), Err(inventory)) => return Err(manifest.merge(inventory)),
    };

    let mut diagnostics: Vec<Diagnostic> = parsed
        .skipped
        .iter()
        .map(|m| m.to_diagnostic(Severity::Warn))
        .collect();
    diagnostics.extend(resolved.diagnostics);

    let aggregate = aggregate(parsed.entries, &resolved.map)?;
    diagnostics.extend_from_slice(aggregate.diagnostics());

    tracing::info!(
        records = aggregate.records().len(),
        boxes = aggregate.box_count(),
        skus = aggregate.sku_type_count(),
        "pipeline complete"
    );
    Ok(PipelineOutput {
        aggregate,
        diagnostics,
    })
}

/// One row of the normalized table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    /// SKU.
    pub sku: String,
    /// Quantity.
    pub quantity: u32,
    /// Manifest row the record came from.
    pub box_index: usize,
    /// Box identifier.
    pub box_number: String,
    /// Location code.
    pub location_code: String,
}

/// The normalized table, in aggregation order.
pub fn normalized_rows(agg: &Aggregate) -> Vec<NormalizedRow> {
    agg.records()
        .iter()
        .map(|r| NormalizedRow {
            sku: r.sku.clone(),
            quantity: r.quantity,
            box_index: r.box_sequence,
            box_number: r.box_number.clone(),
            location_code: r.location_code.clone(),
        })
        .collect()
}

/// Every label document of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSet {
    /// One per box, display order.
    pub box_summaries: Vec<LabelDocument>,
    /// One per record, record order.
    pub single_labels: Vec<LabelDocument>,
    /// The label book.
    pub book: LabelDocument,
}

impl LabelSet {
    /// All documents: box summaries, single labels, then the book.
    pub fn documents(&self) -> impl Iterator<Item = &LabelDocument> {
        self.box_summaries
            .iter()
            .chain(&self.single_labels)
            .chain(std::iter::once(&self.book))
    }
}

/// Lay out and assemble all three label families.
pub fn build_labels(agg: &Aggregate, profile: &LabelProfile, book_name: &str) -> LabelSet {
    LabelSet {
        box_summaries: box_summary_documents(agg, profile),
        single_labels: single_label_documents(agg, profile),
        book: book_document(agg, profile, book_name),
    }
}
