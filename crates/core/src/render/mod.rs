//! Page-flow renderers.
//!
//! A [`Renderer`] turns a [`LabelDocument`] into bytes for one output
//! format. The layout model is format-agnostic; PDF encoding is left to an
//! external renderer consuming the [`JsonRenderer`] interchange form.

/// Direct thermal output.
pub mod zpl;

use crate::assemble::LabelDocument;

pub use zpl::ZplRenderer;

/// Failure while encoding a document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RenderError {
    /// The document has no pages.
    #[error("document '{name}' has no pages")]
    EmptyDocument {
        /// Document stem.
        name: String,
    },
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Encodes a page flow into one output format.
pub trait Renderer {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Encode one document.
    fn render(&self, doc: &LabelDocument) -> Result<Vec<u8>, RenderError>;

    /// `<name>.<extension>`.
    fn file_name(&self, doc: &LabelDocument) -> String {
        format!("{}.{}", doc.name, self.extension())
    }
}

/// Pretty JSON of the document: name, family, geometry and flow.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render(&self, doc: &LabelDocument) -> Result<Vec<u8>, RenderError> {
        let mut bytes = serde_json::to_vec_pretty(doc)?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}
