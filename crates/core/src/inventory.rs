//! Inventory resolver: SKU → location lookup with conflict detection.

use std::collections::{BTreeMap, HashMap, HashSet};

use boxlabel_diagnostics::{Diagnostic, Origin, Table, codes};

use crate::error::{ConflictingLocation, MissingLocation, PipelineError, Problem};
use crate::table::InventoryRow;

/// Read-only mapping from SKU to its single location code.
///
/// Built once by [`resolve_inventory`]; there is no way to mutate it
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationMap {
    locations: HashMap<String, String>,
}

impl LocationMap {
    /// Location code for a SKU.
    pub fn get(&self, sku: &str) -> Option<&str> {
        self.locations.get(sku).map(String::as_str)
    }

    /// Number of mapped SKUs.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// `true` when no SKU is mapped.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Check that every required SKU has a location.
    ///
    /// All missing SKUs are reported together, once each, in the order they
    /// are first required.
    pub fn require<'a>(
        &self,
        skus: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), PipelineError> {
        let mut seen = HashSet::new();
        let missing: Vec<Problem> = skus
            .into_iter()
            .filter(|sku| !self.locations.contains_key(*sku) && seen.insert(*sku))
            .map(|sku| {
                Problem::MissingLocation(MissingLocation {
                    sku: sku.to_string(),
                })
            })
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::new(missing))
        }
    }
}

/// A conflict-free location map plus warnings about ignored rows.
#[derive(Debug, Clone, Default)]
pub struct InventoryResolution {
    /// The validated map.
    pub map: LocationMap,
    /// Warnings for half-empty rows that were ignored.
    pub diagnostics: Vec<Diagnostic>,
}

/// Build the SKU → location map.
///
/// Both cells are trimmed. A SKU seen again with a different location is a
/// conflict; every distinct conflict in the table is collected before the
/// error is returned, and no partial map is handed out. Rows with both cells
/// blank are skipped; rows with one blank cell are skipped with a warning.
pub fn resolve_inventory(rows: &[InventoryRow]) -> Result<InventoryResolution, PipelineError> {
    let mut locations: HashMap<String, String> = HashMap::new();
    let mut conflicts: Vec<ConflictingLocation> = Vec::new();
    let mut diagnostics = Vec::new();
    let mut usable = 0usize;

    for (idx, row) in rows.iter().enumerate() {
        let row_no = idx + 1;
        let sku = row.sku.trim();
        let code = row.location_code.trim();

        match (sku.is_empty(), code.is_empty()) {
            (true, true) => continue,
            (false, false) => {}
            _ => {
                tracing::warn!(
                    row = row_no,
                    sku,
                    location = code,
                    "ignoring incomplete inventory row"
                );
                diagnostics.push(
                    Diagnostic::warn(
                        codes::INCOMPLETE_INVENTORY_ROW,
                        "inventory row needs both a SKU and a location code",
                        Some(Origin::inventory(row_no)),
                    )
                    .with_context(BTreeMap::from([
                        ("sku".into(), sku.to_string()),
                        ("location".into(), code.to_string()),
                    ])),
                );
                continue;
            }
        }
        usable += 1;

        match locations.get(sku) {
            None => {
                locations.insert(sku.to_string(), code.to_string());
            }
            Some(first) if first == code => {}
            Some(first) => {
                let already = conflicts
                    .iter()
                    .any(|c| c.sku == sku && c.second_code == code);
                if !already {
                    conflicts.push(ConflictingLocation {
                        sku: sku.to_string(),
                        first_code: first.clone(),
                        second_code: code.to_string(),
                        row: row_no,
                    });
                }
            }
        }
    }

    if !conflicts.is_empty() {
        return Err(PipelineError::new(
            conflicts
                .into_iter()
                .map(Problem::ConflictingLocation)
                .collect(),
        ));
    }
    if usable == 0 {
        return Err(PipelineError::empty(Table::Inventory));
    }

    tracing::debug!(rows = rows.len(), skus = locations.len(), "resolved inventory");
    Ok(InventoryResolution {
        map: LocationMap { locations },
        diagnostics,
    })
}
