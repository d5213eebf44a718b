//! Manifest parser: SKU-list cells into [`BoxSkuEntry`] records.
//!
//! A SKU-list cell holds `;`-separated items of the form
//! `<quantity> x <sku>`. [`parse_item`] is the single grammar function for
//! one item; [`parse_manifest`] applies it across all rows in encounter
//! order (row-major, then item-major).

use serde::{Deserialize, Serialize};

use crate::error::{ItemError, MalformedItem, PipelineError, Problem};
use crate::table::ManifestRow;

/// Characters accepted between quantity and SKU.
const SEPARATORS: [char; 3] = ['x', 'X', '×'];

/// What to do with items that do not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedItemPolicy {
    /// Collect every malformed item and abort the run.
    #[default]
    Fail,
    /// Drop malformed items and report each one as a warning.
    Skip,
}

/// One manifest line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxSkuEntry {
    /// Trimmed, non-empty SKU.
    pub sku: String,
    /// Positive quantity.
    pub quantity: u32,
    /// 1-based manifest row the item came from.
    pub box_sequence: usize,
    /// Box identifier copied verbatim from the row.
    pub box_number: String,
}

/// A successfully parsed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedItem {
    /// Positive quantity.
    pub quantity: u32,
    /// Trimmed SKU.
    pub sku: String,
}

/// Parse one `<quantity> x <sku>` item.
///
/// The item is split on the first separator (`x`, `X` or `×`); whitespace
/// around each part is insignificant. Later separators belong to the SKU.
pub fn parse_item(item: &str) -> Result<ParsedItem, ItemError> {
    let (qty, sku) = item
        .split_once(SEPARATORS)
        .ok_or(ItemError::MissingSeparator)?;
    let qty = qty.trim();
    let sku = sku.trim();

    if qty.is_empty() {
        return Err(ItemError::EmptyQuantity);
    }
    if !qty.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ItemError::InvalidQuantity(qty.to_string()));
    }
    let quantity: u32 = qty
        .parse()
        .map_err(|_| ItemError::InvalidQuantity(qty.to_string()))?;
    if quantity == 0 {
        return Err(ItemError::ZeroQuantity);
    }
    if sku.is_empty() {
        return Err(ItemError::EmptySku);
    }

    Ok(ParsedItem {
        quantity,
        sku: sku.to_string(),
    })
}

/// Split a SKU-list cell into its non-blank items.
///
/// Blank items (e.g. after a trailing `;`) are not items at all.
pub fn split_items(sku_list: &str) -> impl Iterator<Item = &str> {
    sku_list.split(';').filter(|item| !item.trim().is_empty())
}

/// Result of parsing the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestParse {
    /// Parsed entries in encounter order.
    pub entries: Vec<BoxSkuEntry>,
    /// Items dropped under [`MalformedItemPolicy::Skip`].
    pub skipped: Vec<MalformedItem>,
}

/// Parse every manifest row.
///
/// Under [`MalformedItemPolicy::Fail`] all malformed items are collected
/// before the error is returned. An empty result (no entries at all) is
/// reported as an empty manifest.
pub fn parse_manifest(
    rows: &[ManifestRow],
    policy: MalformedItemPolicy,
) -> Result<ManifestParse, PipelineError> {
    let mut out = ManifestParse::default();

    for (idx, row) in rows.iter().enumerate() {
        let box_sequence = idx + 1;
        if row.is_blank() {
            tracing::debug!(row = box_sequence, "skipping blank manifest row");
            continue;
        }
        for item in split_items(&row.sku_list) {
            match parse_item(item) {
                Ok(ParsedItem { quantity, sku }) => out.entries.push(BoxSkuEntry {
                    sku,
                    quantity,
                    box_sequence,
                    box_number: row.box_number.clone(),
                }),
                Err(reason) => out.skipped.push(MalformedItem {
                    row: box_sequence,
                    item: item.trim().to_string(),
                    reason,
                }),
            }
        }
    }

    if !out.skipped.is_empty() {
        match policy {
            MalformedItemPolicy::Fail => {
                return Err(PipelineError::new(
                    out.skipped.into_iter().map(Problem::MalformedItem).collect(),
                ));
            }
            MalformedItemPolicy::Skip => {
                for m in &out.skipped {
                    tracing::warn!(
                        row = m.row,
                        item = %m.item,
                        reason = %m.reason,
                        "skipping malformed manifest item"
                    );
                }
            }
        }
    }

    if out.entries.is_empty() {
        return Err(PipelineError::empty(boxlabel_diagnostics::Table::Manifest));
    }

    tracing::debug!(
        rows = rows.len(),
        entries = out.entries.len(),
        skipped = out.skipped.len(),
        "parsed manifest"
    );
    Ok(out)
}
