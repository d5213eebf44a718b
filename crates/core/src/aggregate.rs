//! Record aggregator: joins entries with locations and derives box indices,
//! per-box ranks and SKU-type counts.
//!
//! Every index here depends on encounter order, never on sorted order.
//! Box numbers are tracked with a lookup table plus an insertion-ordered
//! `Vec`, so the first box seen is always display index 1.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use boxlabel_diagnostics::{Diagnostic, Origin, codes};

use crate::error::PipelineError;
use crate::inventory::LocationMap;
use crate::manifest::BoxSkuEntry;

/// A manifest entry with its location and derived indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedRecord {
    /// Trimmed SKU.
    pub sku: String,
    /// Quantity (summed if the SKU repeats within the box).
    pub quantity: u32,
    /// 1-based manifest row of the first entry for this record.
    pub box_sequence: usize,
    /// Box identifier.
    pub box_number: String,
    /// Resolved location code.
    pub location_code: String,
    /// 1-based rank of `box_number` among distinct boxes, by first appearance.
    pub box_display_index: usize,
    /// Distinct SKUs across the whole shipment.
    pub shipment_sku_type_count: usize,
    /// Distinct SKUs within this record's box.
    pub box_sku_type_count: usize,
    /// 1-based rank of this record within its box, by encounter order.
    pub box_item_rank: usize,
}

/// A distinct box, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxSummary {
    /// Box identifier.
    pub box_number: String,
    /// 1-based display index.
    pub display_index: usize,
    /// Distinct SKUs in the box.
    pub sku_type_count: usize,
}

/// The aggregated record set for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    records: Vec<AggregatedRecord>,
    boxes: Vec<BoxSummary>,
    sku_type_count: usize,
    #[serde(skip)]
    diagnostics: Vec<Diagnostic>,
}

impl Aggregate {
    /// Records in manifest encounter order.
    pub fn records(&self) -> &[AggregatedRecord] {
        &self.records
    }

    /// Distinct boxes ordered by display index.
    pub fn boxes(&self) -> &[BoxSummary] {
        &self.boxes
    }

    /// Number of distinct box numbers.
    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    /// Number of distinct SKUs in the shipment.
    pub fn sku_type_count(&self) -> usize {
        self.sku_type_count
    }

    /// Records of one box, in rank order.
    pub fn records_for_box<'a>(
        &'a self,
        box_number: &'a str,
    ) -> impl Iterator<Item = &'a AggregatedRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.box_number == box_number)
    }

    /// Informational notes produced while aggregating.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

/// Join entries with their locations and compute the derived fields.
///
/// The first pass assigns locations, display indices and per-box ranks in
/// encounter order; a SKU repeated within the same box folds into its first
/// record. The second pass fills the SKU-type counts once every record is
/// known. Output order equals input order.
pub fn aggregate(
    entries: Vec<BoxSkuEntry>,
    locations: &LocationMap,
) -> Result<Aggregate, PipelineError> {
    locations.require(entries.iter().map(|e| e.sku.as_str()))?;

    let mut records: Vec<AggregatedRecord> = Vec::with_capacity(entries.len());
    let mut boxes: Vec<BoxSummary> = Vec::new();
    let mut box_slot: HashMap<String, usize> = HashMap::new();
    let mut record_slot: HashMap<(String, String), usize> = HashMap::new();
    let mut folded_rows: HashMap<usize, Vec<usize>> = HashMap::new();
    let mut diagnostics = Vec::new();

    for entry in entries {
        let slot = match box_slot.get(&entry.box_number) {
            Some(&slot) => slot,
            None => {
                let slot = boxes.len();
                boxes.push(BoxSummary {
                    box_number: entry.box_number.clone(),
                    display_index: slot + 1,
                    sku_type_count: 0,
                });
                box_slot.insert(entry.box_number.clone(), slot);
                slot
            }
        };

        let key = (entry.box_number.clone(), entry.sku.clone());
        if let Some(&existing) = record_slot.get(&key) {
            let record = &mut records[existing];
            record.quantity = record.quantity.saturating_add(entry.quantity);
            let rows = folded_rows
                .entry(existing)
                .or_insert_with(|| vec![record.box_sequence]);
            if rows.last() != Some(&entry.box_sequence) {
                rows.push(entry.box_sequence);
            }
            tracing::debug!(
                box_number = %entry.box_number,
                sku = %entry.sku,
                "folding repeated SKU"
            );
            diagnostics.push(
                Diagnostic::info(
                    codes::DUPLICATE_BOX_SKU,
                    format!(
                        "SKU {} repeats in box {}; quantities summed to {} under row {}",
                        entry.sku, entry.box_number, record.quantity, record.box_sequence
                    ),
                    Some(Origin::manifest(entry.box_sequence)),
                )
                .with_context(BTreeMap::from([
                    ("box".into(), entry.box_number.clone()),
                    ("sku".into(), entry.sku.clone()),
                    (
                        "rows".into(),
                        rows.iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(", "),
                    ),
                ])),
            );
            continue;
        }

        // `require` above guarantees the lookup succeeds.
        let location_code = locations.get(&entry.sku).unwrap_or_default().to_string();
        let summary = &mut boxes[slot];
        summary.sku_type_count += 1;
        record_slot.insert(key, records.len());
        records.push(AggregatedRecord {
            sku: entry.sku,
            quantity: entry.quantity,
            box_sequence: entry.box_sequence,
            box_number: entry.box_number,
            location_code,
            box_display_index: summary.display_index,
            shipment_sku_type_count: 0,
            box_sku_type_count: 0,
            box_item_rank: summary.sku_type_count,
        });
    }

    let (box_counts, sku_type_count) = {
        let mut per_box: Vec<HashSet<&str>> = vec![HashSet::new(); boxes.len()];
        let mut shipment: HashSet<&str> = HashSet::new();
        for r in &records {
            per_box[r.box_display_index - 1].insert(&r.sku);
            shipment.insert(&r.sku);
        }
        let counts: Vec<usize> = per_box.iter().map(HashSet::len).collect();
        (counts, shipment.len())
    };

    for r in &mut records {
        r.box_sku_type_count = box_counts[r.box_display_index - 1];
        r.shipment_sku_type_count = sku_type_count;
    }
    debug_assert!(
        boxes
            .iter()
            .zip(&box_counts)
            .all(|(b, &n)| b.sku_type_count == n),
        "per-box rank counter disagrees with distinct SKU count"
    );

    tracing::debug!(
        records = records.len(),
        boxes = boxes.len(),
        skus = sku_type_count,
        "aggregated records"
    );
    Ok(Aggregate {
        records,
        boxes,
        sku_type_count,
        diagnostics,
    })
}
