use serde::{Deserialize, Serialize};

/// One row of the box manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRow {
    /// Warehouse receipt / box identifier, kept verbatim.
    pub box_number: String,
    /// SKU-list cell, e.g. `"20 x A1;9 x B2"`.
    pub sku_list: String,
}

impl ManifestRow {
    /// Build a row from its two cells.
    pub fn new(box_number: impl Into<String>, sku_list: impl Into<String>) -> Self {
        Self {
            box_number: box_number.into(),
            sku_list: sku_list.into(),
        }
    }

    /// `true` when both cells are blank (trailing spreadsheet rows).
    pub fn is_blank(&self) -> bool {
        self.box_number.trim().is_empty() && self.sku_list.trim().is_empty()
    }
}

/// One row of the inventory table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    /// Product SKU.
    pub sku: String,
    /// Storage location the SKU is kept at.
    pub location_code: String,
}

impl InventoryRow {
    /// Build a row from a SKU and its location code.
    pub fn new(sku: impl Into<String>, location_code: impl Into<String>) -> Self {
        Self {
            sku: sku.into(),
            location_code: location_code.into(),
        }
    }
}
