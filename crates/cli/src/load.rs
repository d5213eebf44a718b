//! CSV table loading.
//!
//! The first row is the header; columns are picked by name. The raw text is
//! kept so diagnostics can point at the offending line.

use std::fs;
use std::ops::Range;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use boxlabel_core::{InventoryRow, ManifestRow};
use csv::{ReaderBuilder, StringRecord};

/// One CSV file, parsed.
#[derive(Debug)]
pub(crate) struct LoadedTable {
    /// Display name (the path as given).
    pub(crate) name: String,
    /// File contents without a leading byte-order mark.
    pub(crate) source: String,
    headers: Vec<String>,
    records: Vec<StringRecord>,
    spans: Vec<Range<usize>>,
}

impl LoadedTable {
    pub(crate) fn read(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(path.display().to_string(), source)
    }

    pub(crate) fn parse(name: String, source: String) -> Result<Self> {
        let source = match source.strip_prefix('\u{feff}') {
            Some(rest) => rest.to_string(),
            None => source,
        };

        let (headers, records) = {
            let mut reader = ReaderBuilder::new()
                .flexible(true)
                .from_reader(source.as_bytes());
            let headers: Vec<String> = reader
                .headers()
                .with_context(|| format!("failed to read the header row of {name}"))?
                .iter()
                .map(|h| h.trim().to_string())
                .collect();
            let records = reader
                .records()
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("failed to parse CSV in {name}"))?;
            (headers, records)
        };

        let starts: Vec<usize> = records
            .iter()
            .map(|r| r.position().map_or(0, |p| p.byte() as usize))
            .collect();
        let spans = starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = starts.get(i + 1).copied().unwrap_or(source.len());
                let line = &source[start..end];
                start..start + line.trim_end().len()
            })
            .collect();

        tracing::debug!(table = %name, rows = records.len(), "loaded CSV");
        Ok(Self {
            name,
            source,
            headers,
            records,
            spans,
        })
    }

    fn column(&self, name: &str) -> Result<usize> {
        self.headers.iter().position(|h| h == name).ok_or_else(|| {
            anyhow!(
                "{} has no column '{}' (available: {})",
                self.name,
                name,
                self.headers.join(", ")
            )
        })
    }

    /// Cells of two named columns, row by row.
    fn pairs(&self, first: &str, second: &str) -> Result<Vec<(&str, &str)>> {
        let (a, b) = (self.column(first)?, self.column(second)?);
        Ok(self
            .records
            .iter()
            .map(|r| (r.get(a).unwrap_or(""), r.get(b).unwrap_or("")))
            .collect())
    }

    /// Byte range of a 1-based data row in [`Self::source`].
    pub(crate) fn row_span(&self, row: usize) -> Option<Range<usize>> {
        row.checked_sub(1).and_then(|i| self.spans.get(i)).cloned()
    }

    /// Number of data rows.
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}

/// Manifest rows, cells verbatim.
pub(crate) fn manifest_rows(
    table: &LoadedTable,
    box_column: &str,
    sku_list_column: &str,
) -> Result<Vec<ManifestRow>> {
    Ok(table
        .pairs(box_column, sku_list_column)?
        .into_iter()
        .map(|(b, list)| ManifestRow::new(b, list))
        .collect())
}

/// Inventory rows, cells trimmed.
pub(crate) fn inventory_rows(
    table: &LoadedTable,
    sku_column: &str,
    location_column: &str,
) -> Result<Vec<InventoryRow>> {
    Ok(table
        .pairs(sku_column, location_column)?
        .into_iter()
        .map(|(sku, code)| InventoryRow::new(sku.trim(), code.trim()))
        .collect())
}
