//! Abstract label page model and the three label layouts.
//!
//! A page is a vertical stack of [`Block`]s. Pages are joined into a flow of
//! [`FlowItem`]s where a [`FlowItem::PageBreak`] separates consecutive pages
//! and never follows the last one. Dimensions are in points.

/// Location code split rule.
pub mod code;
/// Box summary, single-SKU and label book layouts.
pub mod pages;

use serde::{Deserialize, Serialize};

use boxlabel_profile::Page;

pub use code::{SplitCode, split_location_code};
pub use pages::{book_pages, box_summary_pages, box_title, single_record_pages};

/// Table cell padding above and below text.
pub const CELL_PADDING_PT: f64 = 3.0;

/// Line height relative to the font size when no leading is given.
pub const LINE_HEIGHT: f64 = 1.2;

/// Physical page geometry of a flow, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    /// Page width.
    pub width_pt: f64,
    /// Page height.
    pub height_pt: f64,
    /// Margin on all four sides.
    pub margin_pt: f64,
}

impl PageGeometry {
    /// Width inside the margins.
    pub fn usable_width_pt(&self) -> f64 {
        self.width_pt - 2.0 * self.margin_pt
    }

    /// Height inside the margins.
    pub fn usable_height_pt(&self) -> f64 {
        self.height_pt - 2.0 * self.margin_pt
    }
}

impl From<&Page> for PageGeometry {
    fn from(page: &Page) -> Self {
        Self {
            width_pt: page.width_pt(),
            height_pt: page.height_pt(),
            margin_pt: page.margin_pt(),
        }
    }
}

/// Horizontal alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    /// Flush left.
    Left,
    /// Centred.
    #[default]
    Center,
    /// Flush right.
    Right,
}

/// Vertical alignment inside a fixed-height panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    /// Against the top edge.
    Top,
    /// Centred.
    #[default]
    Middle,
}

/// Text appearance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size.
    pub size_pt: f64,
    /// Bold face.
    pub bold: bool,
    /// Horizontal alignment.
    pub align: Align,
    /// White text for dark backgrounds.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub inverted: bool,
}

impl TextStyle {
    /// Centred regular text.
    pub fn regular(size_pt: f64) -> Self {
        Self {
            size_pt,
            bold: false,
            align: Align::Center,
            inverted: false,
        }
    }

    /// Centred bold text.
    pub fn bold(size_pt: f64) -> Self {
        Self {
            bold: true,
            ..Self::regular(size_pt)
        }
    }

    /// Same style, white on dark.
    pub fn inverted(self) -> Self {
        Self {
            inverted: true,
            ..self
        }
    }

    /// Same style, different alignment.
    pub fn aligned(self, align: Align) -> Self {
        Self { align, ..self }
    }
}

/// One or more lines of text in a single style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Lines, top to bottom.
    pub lines: Vec<String>,
    /// Style shared by every line.
    pub style: TextStyle,
    /// Baseline-to-baseline distance.
    pub leading_pt: f64,
}

impl TextBlock {
    /// A single line with the default leading.
    pub fn line(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            lines: vec![text.into()],
            style,
            leading_pt: style.size_pt * LINE_HEIGHT,
        }
    }

    /// Height of all lines.
    pub fn height_pt(&self) -> f64 {
        self.lines.len() as f64 * self.leading_pt
    }
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Cell text.
    pub text: String,
    /// Cell style.
    pub style: TextStyle,
}

impl Cell {
    /// Build a cell.
    pub fn new(text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Border stroke widths.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// Outer box.
    pub outer_pt: f64,
    /// Grid lines between cells.
    pub inner_pt: f64,
}

/// A fixed-column table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableBlock {
    /// Column widths; every row has exactly this many cells.
    pub column_widths_pt: Vec<f64>,
    /// Rows, the first one being the header.
    pub rows: Vec<Vec<Cell>>,
    /// Optional grid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
}

impl TableBlock {
    /// Total width.
    pub fn width_pt(&self) -> f64 {
        self.column_widths_pt.iter().sum()
    }

    /// Height of one row: its largest cell plus padding.
    pub fn row_height_pt(row: &[Cell]) -> f64 {
        let size = row.iter().map(|c| c.style.size_pt).fold(0.0, f64::max);
        size * LINE_HEIGHT + 2.0 * CELL_PADDING_PT
    }

    /// Height of all rows.
    pub fn height_pt(&self) -> f64 {
        self.rows.iter().map(|r| Self::row_height_pt(r)).sum()
    }
}

/// Background of a panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fill {
    /// No background.
    #[default]
    None,
    /// Solid black.
    Black,
}

/// A fixed-size box holding text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelBlock {
    /// Box width.
    pub width_pt: f64,
    /// Box height.
    pub height_pt: f64,
    /// Background.
    pub fill: Fill,
    /// Vertical placement of the text.
    pub valign: VAlign,
    /// The text.
    pub content: TextBlock,
}

/// Corner an overlay is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Corner {
    /// Top left.
    TopLeft,
    /// Top right.
    TopRight,
    /// Bottom left.
    BottomLeft,
    /// Bottom right.
    BottomRight,
}

/// Two layers in one region: `overlay` is drawn over `base`, anchored to
/// one of its corners. The overlay takes no vertical space of its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayBlock {
    /// Bottom layer; defines the region.
    pub base: Box<Block>,
    /// Top layer.
    pub overlay: Box<Block>,
    /// Anchor corner of `base`.
    pub anchor: Corner,
    /// Distance from the anchored edges.
    pub inset_pt: f64,
}

impl OverlayBlock {
    /// Offset of the overlay's top-left corner from the base's top-left
    /// corner, given the width the base occupies.
    pub fn overlay_offset(&self, base_width_pt: f64) -> (f64, f64) {
        let base_h = self.base.height_pt();
        let (ow, oh) = (
            self.overlay.width_pt().unwrap_or(0.0),
            self.overlay.height_pt(),
        );
        let right = base_width_pt - ow - self.inset_pt;
        let bottom = base_h - oh - self.inset_pt;
        match self.anchor {
            Corner::TopLeft => (self.inset_pt, self.inset_pt),
            Corner::TopRight => (right, self.inset_pt),
            Corner::BottomLeft => (self.inset_pt, bottom),
            Corner::BottomRight => (right, bottom),
        }
    }
}

/// An element of a label page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum Block {
    /// Title or free text.
    Text(TextBlock),
    /// Fixed-column table.
    Table(TableBlock),
    /// Vertical gap.
    Spacer {
        /// Gap height.
        height_pt: f64,
    },
    /// Fixed-size box with text.
    Panel(PanelBlock),
    /// Base block with a corner-anchored overlay.
    Overlay(OverlayBlock),
}

impl Block {
    /// Vertical space the block takes in the flow.
    pub fn height_pt(&self) -> f64 {
        match self {
            Block::Text(t) => t.height_pt(),
            Block::Table(t) => t.height_pt(),
            Block::Spacer { height_pt } => *height_pt,
            Block::Panel(p) => p.height_pt,
            Block::Overlay(o) => o.base.height_pt(),
        }
    }

    /// Intrinsic width, for blocks that have one.
    pub fn width_pt(&self) -> Option<f64> {
        match self {
            Block::Table(t) => Some(t.width_pt()),
            Block::Panel(p) => Some(p.width_pt),
            Block::Overlay(o) => o.base.width_pt(),
            Block::Text(_) | Block::Spacer { .. } => None,
        }
    }

    /// A spacer.
    pub fn spacer(height_pt: f64) -> Self {
        Block::Spacer { height_pt }
    }
}

/// One printable label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelPage {
    /// Blocks, top to bottom.
    pub blocks: Vec<Block>,
}

impl LabelPage {
    /// Total height of the stacked blocks.
    pub fn content_height_pt(&self) -> f64 {
        self.blocks.iter().map(Block::height_pt).sum()
    }
}

/// An element of a page flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "flow", rename_all = "snake_case")]
pub enum FlowItem {
    /// A block on the current page.
    Block(Block),
    /// Start a new page.
    PageBreak,
}

/// Join pages into a flow with a break between consecutive pages and none
/// after the last.
pub fn flow(pages: Vec<LabelPage>) -> Vec<FlowItem> {
    let mut out = Vec::new();
    for (i, page) in pages.into_iter().enumerate() {
        if i > 0 {
            out.push(FlowItem::PageBreak);
        }
        out.extend(page.blocks.into_iter().map(FlowItem::Block));
    }
    out
}

/// Split a flow back into pages.
pub fn paginate(flow: &[FlowItem]) -> Vec<Vec<&Block>> {
    if flow.is_empty() {
        return Vec::new();
    }
    let mut pages = vec![Vec::new()];
    for item in flow {
        match item {
            FlowItem::PageBreak => pages.push(Vec::new()),
            FlowItem::Block(b) => {
                if let Some(page) = pages.last_mut() {
                    page.push(b);
                }
            }
        }
    }
    pages
}
