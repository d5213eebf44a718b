//! Box label core library.
//!
//! Normalizes a warehouse box manifest against an inventory location table
//! and lays the resulting records out as printable labels. The main entry
//! points are [`run`] for the parse/resolve/aggregate pipeline,
//! [`build_labels`] for the three label families, and the [`Renderer`]
//! implementations for output.

#![warn(missing_docs)]

/// Record aggregation and derived indices.
pub mod aggregate;
/// Grouping pages into named documents.
pub mod assemble;
/// Typed pipeline errors.
pub mod error;
/// SKU to location resolution.
pub mod inventory;
/// Page model and label layouts.
pub mod layout;
/// SKU-list parsing.
pub mod manifest;
/// Stage orchestration.
pub mod pipeline;
/// Document encoders.
pub mod render;
/// Input row types.
pub mod table;

// ── Convenience re-exports ──────────────────────────────────────────────────

// Input
pub use table::{InventoryRow, ManifestRow};

// Stages
pub use aggregate::{Aggregate, AggregatedRecord, BoxSummary, aggregate};
pub use inventory::{InventoryResolution, LocationMap, resolve_inventory};
pub use manifest::{BoxSkuEntry, MalformedItemPolicy, ParsedItem, parse_item, parse_manifest};

// Errors
pub use error::{
    ConflictingLocation, ItemError, MalformedItem, MissingLocation, PipelineError, Problem,
};

// Orchestration
pub use pipeline::{
    LabelSet, NormalizedRow, PipelineConfig, PipelineOutput, build_labels, normalized_rows, run,
};

// Layout and output
pub use assemble::{DEFAULT_BOOK_NAME, DocumentFamily, LabelDocument};
pub use layout::{Block, FlowItem, LabelPage, PageGeometry, split_location_code};
pub use render::{JsonRenderer, RenderError, Renderer, ZplRenderer};

// Diagnostics and profiles (re-exported from their crates)
pub use boxlabel_diagnostics::{Diagnostic, Severity, codes};
pub use boxlabel_profile::{LabelProfile, Stock};
