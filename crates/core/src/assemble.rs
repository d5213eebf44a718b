//! Document assembler: groups laid-out pages into named output documents.
//!
//! Names are stems; the renderer adds the extension.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use boxlabel_profile::LabelProfile;

use crate::aggregate::{Aggregate, AggregatedRecord};
use crate::layout::{
    FlowItem, LabelPage, PageGeometry, book_pages, box_summary_pages, flow, single_record_pages,
};

/// Characters kept from the box number in a summary document name.
pub const SUMMARY_STEM_CHARS: usize = 11;

/// Default stem of the label book.
pub const DEFAULT_BOOK_NAME: &str = "labels";

/// Which layout produced a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFamily {
    /// One page per box.
    BoxSummary,
    /// One page per record.
    SingleLabel,
    /// Every record, one page each, in a single document.
    Book,
}

/// A named, renderer-independent page flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelDocument {
    /// File stem, unique within its family.
    pub name: String,
    /// Layout family.
    pub family: DocumentFamily,
    /// Page size shared by every page.
    pub geometry: PageGeometry,
    /// Blocks and page breaks; never ends with a break.
    pub flow: Vec<FlowItem>,
}

impl LabelDocument {
    fn new(
        name: String,
        family: DocumentFamily,
        profile: &LabelProfile,
        pages: Vec<LabelPage>,
    ) -> Self {
        Self {
            name,
            family,
            geometry: PageGeometry::from(&profile.page),
            flow: flow(pages),
        }
    }

    /// Number of pages in the flow.
    pub fn page_count(&self) -> usize {
        if self.flow.is_empty() {
            return 0;
        }
        1 + self
            .flow
            .iter()
            .filter(|i| matches!(i, FlowItem::PageBreak))
            .count()
    }
}

/// First [`SUMMARY_STEM_CHARS`] characters of the box number.
pub fn summary_document_stem(box_number: &str) -> String {
    sanitize(&box_number.chars().take(SUMMARY_STEM_CHARS).collect::<String>())
}

/// `<box_number>_<sku>_<location_code>`.
pub fn single_label_stem(record: &AggregatedRecord) -> String {
    sanitize(&format!(
        "{}_{}_{}",
        record.box_number, record.sku, record.location_code
    ))
}

fn sanitize(stem: &str) -> String {
    stem.replace(['/', '\\'], "-")
}

/// Make every stem unique by suffixing repeats with `-2`, `-3`, ...
///
/// A suffix is only taken when no earlier document already holds the
/// resulting name, natural or generated.
fn dedupe_names(docs: &mut [LabelDocument]) {
    let mut used: HashSet<String> = HashSet::with_capacity(docs.len());
    for doc in docs {
        if used.insert(doc.name.clone()) {
            continue;
        }
        let mut n = 2;
        let renamed = loop {
            let candidate = format!("{}-{n}", doc.name);
            if !used.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        tracing::debug!(from = %doc.name, to = %renamed, "renaming duplicate document");
        used.insert(renamed.clone());
        doc.name = renamed;
    }
}

/// One document per box, in display order.
pub fn box_summary_documents(agg: &Aggregate, profile: &LabelProfile) -> Vec<LabelDocument> {
    let mut docs: Vec<LabelDocument> = agg
        .boxes()
        .iter()
        .zip(box_summary_pages(agg, profile))
        .map(|(b, page)| {
            LabelDocument::new(
                summary_document_stem(&b.box_number),
                DocumentFamily::BoxSummary,
                profile,
                vec![page],
            )
        })
        .collect();
    dedupe_names(&mut docs);
    docs
}

/// One document per record, in record order.
pub fn single_label_documents(agg: &Aggregate, profile: &LabelProfile) -> Vec<LabelDocument> {
    let mut docs: Vec<LabelDocument> = agg
        .records()
        .iter()
        .zip(single_record_pages(agg, profile))
        .map(|(r, page)| {
            LabelDocument::new(
                single_label_stem(r),
                DocumentFamily::SingleLabel,
                profile,
                vec![page],
            )
        })
        .collect();
    dedupe_names(&mut docs);
    docs
}

/// The label book: every record, one page each.
pub fn book_document(agg: &Aggregate, profile: &LabelProfile, name: &str) -> LabelDocument {
    LabelDocument::new(
        sanitize(name),
        DocumentFamily::Book,
        profile,
        book_pages(agg, profile),
    )
}
