//! Label stock profiles for boxlabel.
//!
//! A profile fixes the physical page (size and margins), the print
//! resolution used by dot-based renderers, and the type sizes of every
//! label element. Label stock is a deployment concern, so none of these
//! values are baked into the layout code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// PostScript points per millimetre.
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Convert millimetres to points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_MM
}

/// Errors that can occur when loading or validating a label profile.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// JSON deserialization failed.
    #[error("invalid profile JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A required field value is out of its valid range.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// The name of the field that failed validation.
        field: String,
        /// A human-readable explanation of why the field value is invalid.
        reason: String,
    },
}

/// A label stock profile.
///
/// # Example
/// ```
/// let profile = boxlabel_profile::LabelProfile::tall();
/// assert_eq!(profile.page.width_mm, 100.0);
/// assert_eq!(profile.page.height_mm, 150.0);
/// assert!(profile.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelProfile {
    /// Unique profile identifier (e.g., `"tall-100x150"`).
    pub id: String,
    /// Profile schema version for forward compatibility (e.g., `"1.0.0"`).
    pub schema_version: String,
    /// Print resolution in dots per inch for dot-based renderers.
    pub dpi: u32,
    /// Physical page geometry.
    pub page: Page,
    /// Type sizes for every label element.
    #[serde(default)]
    pub typography: Typography,
}

/// Physical page geometry in millimetres.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Page {
    /// Page width.
    pub width_mm: f64,
    /// Page height.
    pub height_mm: f64,
    /// Margin applied on all four sides.
    pub margin_mm: f64,
}

impl Page {
    /// Page width in points.
    pub fn width_pt(&self) -> f64 {
        mm_to_pt(self.width_mm)
    }

    /// Page height in points.
    pub fn height_pt(&self) -> f64 {
        mm_to_pt(self.height_mm)
    }

    /// Margin in points.
    pub fn margin_pt(&self) -> f64 {
        mm_to_pt(self.margin_mm)
    }

    /// Width inside the margins, in points.
    pub fn usable_width_pt(&self) -> f64 {
        mm_to_pt(self.width_mm - 2.0 * self.margin_mm)
    }

    /// Height inside the margins, in points.
    pub fn usable_height_pt(&self) -> f64 {
        mm_to_pt(self.height_mm - 2.0 * self.margin_mm)
    }
}

/// Type sizes, in points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Typography {
    /// Title line of box summary labels.
    pub summary_title_pt: f64,
    /// Title lines of single-SKU labels and the label book.
    pub title_pt: f64,
    /// SKU and quantity column headers.
    pub header_pt: f64,
    /// Location code column header; the dominant element of a summary label.
    pub location_header_pt: f64,
    /// Table body cells.
    pub body_pt: f64,
    /// Oversized location code on single-SKU labels.
    pub big_code_pt: f64,
    /// Line leading of the single-SKU big code.
    pub big_code_leading_pt: f64,
    /// Oversized location code in the label book.
    pub book_code_pt: f64,
    /// Line leading of the label book big code.
    pub book_code_leading_pt: f64,
    /// Vertical space the label book keeps above the big code region.
    pub book_reserved_pt: f64,
    /// Per-box rank badge text.
    pub badge_pt: f64,
    /// Side of the square badge box.
    pub badge_box_pt: f64,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            summary_title_pt: 10.0,
            title_pt: 20.0,
            header_pt: 18.0,
            location_header_pt: 50.0,
            body_pt: 14.0,
            big_code_pt: 120.0,
            big_code_leading_pt: 90.0,
            book_code_pt: 100.0,
            book_code_leading_pt: 95.0,
            book_reserved_pt: 130.0,
            badge_pt: 36.0,
            badge_box_pt: 40.0,
        }
    }
}

impl Typography {
    fn sizes(&self) -> [(&'static str, f64); 12] {
        [
            ("typography.summary_title_pt", self.summary_title_pt),
            ("typography.title_pt", self.title_pt),
            ("typography.header_pt", self.header_pt),
            ("typography.location_header_pt", self.location_header_pt),
            ("typography.body_pt", self.body_pt),
            ("typography.big_code_pt", self.big_code_pt),
            ("typography.big_code_leading_pt", self.big_code_leading_pt),
            ("typography.book_code_pt", self.book_code_pt),
            ("typography.book_code_leading_pt", self.book_code_leading_pt),
            ("typography.book_reserved_pt", self.book_reserved_pt),
            ("typography.badge_pt", self.badge_pt),
            ("typography.badge_box_pt", self.badge_box_pt),
        ]
    }
}

/// Named stock presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stock {
    /// 100 mm × 150 mm.
    Tall,
    /// 100 mm × 100 mm.
    Square,
}

impl LabelProfile {
    /// 100 mm × 150 mm stock with 5 mm margins.
    pub fn tall() -> Self {
        Self::preset(Stock::Tall)
    }

    /// 100 mm × 100 mm stock with 5 mm margins.
    pub fn square() -> Self {
        Self::preset(Stock::Square)
    }

    /// Build the profile for a named stock.
    pub fn preset(stock: Stock) -> Self {
        let (id, height_mm, typography) = match stock {
            Stock::Tall => ("tall-100x150", 150.0, Typography::default()),
            Stock::Square => (
                "square-100x100",
                100.0,
                // The shorter page cannot hold the 120 pt two-line code.
                Typography {
                    location_header_pt: 36.0,
                    big_code_pt: 80.0,
                    big_code_leading_pt: 62.0,
                    book_code_pt: 60.0,
                    book_code_leading_pt: 58.0,
                    book_reserved_pt: 120.0,
                    ..Typography::default()
                },
            ),
        };
        Self {
            id: id.into(),
            schema_version: "1.0.0".into(),
            dpi: 203,
            page: Page {
                width_mm: 100.0,
                height_mm,
                margin_mm: 5.0,
            },
            typography,
        }
    }

    /// Check structural invariants.
    ///
    /// - `id` and `schema_version` must be non-empty
    /// - `dpi` must be in range 100–600
    /// - page width and height must be > 0, margins >= 0, and the margins
    ///   must leave a positive usable area
    /// - every typography size must be > 0
    /// - the big code sizes must be within 6–200 pt
    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.id.trim().is_empty() {
            return Err(invalid("id", "must not be empty"));
        }
        if self.schema_version.trim().is_empty() {
            return Err(invalid("schema_version", "must not be empty"));
        }

        if self.dpi < 100 {
            return Err(invalid(
                "dpi",
                format!("{} is below minimum supported DPI (100)", self.dpi),
            ));
        }
        if self.dpi > 600 {
            return Err(invalid(
                "dpi",
                format!("{} exceeds maximum supported DPI (600)", self.dpi),
            ));
        }

        let page = &self.page;
        if !positive(page.width_mm) {
            return Err(invalid("page.width_mm", "must be > 0"));
        }
        if !positive(page.height_mm) {
            return Err(invalid("page.height_mm", "must be > 0"));
        }
        if page.margin_mm.is_nan() || page.margin_mm < 0.0 {
            return Err(invalid("page.margin_mm", "must be >= 0"));
        }
        if 2.0 * page.margin_mm >= page.width_mm.min(page.height_mm) {
            return Err(invalid(
                "page.margin_mm",
                format!(
                    "{} mm margins leave no usable area on a {}x{} mm page",
                    page.margin_mm, page.width_mm, page.height_mm
                ),
            ));
        }

        for (field, size) in self.typography.sizes() {
            if !positive(size) {
                return Err(invalid(field, "must be > 0"));
            }
        }
        for (field, size) in [
            ("typography.big_code_pt", self.typography.big_code_pt),
            ("typography.book_code_pt", self.typography.book_code_pt),
        ] {
            if !(6.0..=200.0).contains(&size) {
                return Err(invalid(field, format!("{size} is outside 6-200 pt")));
            }
        }

        Ok(())
    }
}

fn positive(v: f64) -> bool {
    v > 0.0
}

fn invalid(field: &str, reason: impl Into<String>) -> ProfileError {
    ProfileError::InvalidField {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Load and validate a [`LabelProfile`] from a JSON string.
///
/// The `id`, `schema_version`, `dpi` and `page` fields are required;
/// `typography` falls back to the defaults field by field.
pub fn load_profile_from_str(s: &str) -> Result<LabelProfile, ProfileError> {
    let profile: LabelProfile = serde_json::from_str(s)?;
    profile.validate()?;
    Ok(profile)
}
