//! ZPL renderer: one `^XA ... ^XZ` label per page.
//!
//! Points are converted to printer dots at the profile DPI. All field data
//! goes through `^FH` so `^`, `~` and `_` in SKUs or codes cannot be read as
//! commands.

use std::fmt::Write as _;

use super::{RenderError, Renderer};
use crate::assemble::LabelDocument;
use crate::layout::{
    Align, Block, CELL_PADDING_PT, Fill, PageGeometry, PanelBlock, TableBlock, TextBlock,
    TextStyle, VAlign, paginate,
};

/// Field data hex indicator used with `^FH`.
const HEX_INDICATOR: char = '_';

/// Emits ZPL II for direct thermal printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZplRenderer {
    dpi: u32,
}

impl ZplRenderer {
    /// Renderer for a printer of the given resolution.
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    /// Printer resolution.
    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    /// Convert points to dots.
    pub fn dots(&self, pt: f64) -> u32 {
        (pt * f64::from(self.dpi) / 72.0).round().max(0.0) as u32
    }
}

impl Renderer for ZplRenderer {
    fn extension(&self) -> &'static str {
        "zpl"
    }

    fn render(&self, doc: &LabelDocument) -> Result<Vec<u8>, RenderError> {
        let pages = paginate(&doc.flow);
        if pages.is_empty() {
            return Err(RenderError::EmptyDocument {
                name: doc.name.clone(),
            });
        }
        let mut out = String::new();
        for blocks in &pages {
            let mut label = Label::new(self, &doc.geometry);
            for block in blocks {
                label.block(block);
            }
            out.push_str(&label.finish());
        }
        tracing::debug!(document = %doc.name, pages = pages.len(), dpi = self.dpi, "rendered ZPL");
        Ok(out.into_bytes())
    }
}

/// Escape field data for `^FH_`.
pub fn escape_field_data(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '^' | '~' | HEX_INDICATOR => {
                let _ = write!(out, "{HEX_INDICATOR}{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

fn justification(align: Align) -> char {
    match align {
        Align::Left => 'L',
        Align::Center => 'C',
        Align::Right => 'R',
    }
}

// ── Label writer ────────────────────────────────────────────────────────

/// One label under construction; `y` is the top of the next block in dots.
struct Label<'r> {
    r: &'r ZplRenderer,
    out: String,
    left: u32,
    usable_width: u32,
    y: u32,
}

impl<'r> Label<'r> {
    fn new(r: &'r ZplRenderer, geometry: &PageGeometry) -> Self {
        let mut out = String::new();
        let _ = write!(
            out,
            "^XA\n^CI28\n^PW{}\n^LL{}\n^LH0,0\n",
            r.dots(geometry.width_pt),
            r.dots(geometry.height_pt)
        );
        Self {
            r,
            out,
            left: r.dots(geometry.margin_pt),
            usable_width: r.dots(geometry.usable_width_pt()),
            y: r.dots(geometry.margin_pt),
        }
    }

    fn finish(mut self) -> String {
        self.out.push_str("^XZ\n");
        self.out
    }

    /// Left edge that centres `width` dots inside the margins.
    fn centred_x(&self, width: u32) -> u32 {
        self.left + self.usable_width.saturating_sub(width) / 2
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Text(t) => {
                self.text(t, self.left, self.y, self.usable_width);
                self.y += self.r.dots(t.height_pt());
            }
            Block::Table(t) => {
                let x = self.centred_x(self.r.dots(t.width_pt()));
                self.table(t, x, self.y);
                self.y += self.r.dots(t.height_pt());
            }
            Block::Spacer { height_pt } => self.y += self.r.dots(*height_pt),
            Block::Panel(p) => {
                let x = self.centred_x(self.r.dots(p.width_pt));
                self.panel(p, x, self.y);
                self.y += self.r.dots(p.height_pt);
            }
            Block::Overlay(o) => {
                let base_width_pt = o.base.width_pt().unwrap_or(0.0);
                let x = self.centred_x(self.r.dots(base_width_pt));
                let top = self.y;
                self.placed(&o.base, x, top);
                let (dx, dy) = o.overlay_offset(base_width_pt);
                self.placed(
                    &o.overlay,
                    x + self.r.dots(dx.max(0.0)),
                    top + self.r.dots(dy.max(0.0)),
                );
                self.y = top + self.r.dots(o.base.height_pt());
            }
        }
    }

    /// Draw a block at a fixed position without advancing the cursor.
    fn placed(&mut self, block: &Block, x: u32, y: u32) {
        match block {
            Block::Panel(p) => self.panel(p, x, y),
            Block::Table(t) => self.table(t, x, y),
            Block::Text(t) => self.text(t, x, y, self.usable_width),
            Block::Spacer { .. } => {}
            Block::Overlay(_) => {
                let saved = self.y;
                self.y = y;
                self.block(block);
                self.y = saved;
            }
        }
    }

    fn text(&mut self, t: &TextBlock, x: u32, y: u32, width: u32) {
        let leading = self.r.dots(t.leading_pt);
        for (i, line) in t.lines.iter().enumerate() {
            self.field(line, &t.style, x, y + i as u32 * leading, width);
        }
    }

    /// Font 0 has no bold face; bold text is set wider.
    fn field(&mut self, text: &str, style: &TextStyle, x: u32, y: u32, width: u32) {
        let h = self.r.dots(style.size_pt).max(1);
        let w = if style.bold { h } else { h * 9 / 10 };
        let _ = write!(
            self.out,
            "^FO{x},{y}^A0N,{h},{w}^FB{width},1,0,{}^FH{HEX_INDICATOR}",
            justification(style.align)
        );
        if style.inverted {
            self.out.push_str("^FR");
        }
        let _ = writeln!(self.out, "^FD{}^FS", escape_field_data(text));
    }

    fn table(&mut self, t: &TableBlock, x: u32, y: u32) {
        let r = self.r;
        let width = r.dots(t.width_pt());
        let height = r.dots(t.height_pt());
        let pad = r.dots(CELL_PADDING_PT);

        if let Some(border) = t.border {
            let outer = r.dots(border.outer_pt).max(1);
            let inner = r.dots(border.inner_pt).max(1);
            let _ = writeln!(self.out, "^FO{x},{y}^GB{width},{height},{outer}^FS");
            let mut col_x = x;
            for w in t.column_widths_pt.iter().take(t.column_widths_pt.len().saturating_sub(1)) {
                col_x += r.dots(*w);
                let _ = writeln!(self.out, "^FO{col_x},{y}^GB{inner},{height},{inner}^FS");
            }
            let mut row_y = y;
            for row in t.rows.iter().take(t.rows.len().saturating_sub(1)) {
                row_y += r.dots(TableBlock::row_height_pt(row));
                let _ = writeln!(self.out, "^FO{x},{row_y}^GB{width},{inner},{inner}^FS");
            }
        }

        let mut row_y = y;
        for row in &t.rows {
            let mut cell_x = x;
            for (cell, w) in row.iter().zip(&t.column_widths_pt) {
                let col = r.dots(*w);
                self.field(
                    &cell.text,
                    &cell.style,
                    cell_x + pad,
                    row_y + pad,
                    col.saturating_sub(2 * pad),
                );
                cell_x += col;
            }
            row_y += r.dots(TableBlock::row_height_pt(row));
        }
    }

    fn panel(&mut self, p: &PanelBlock, x: u32, y: u32) {
        let r = self.r;
        let (w, h) = (r.dots(p.width_pt), r.dots(p.height_pt));
        if p.fill == Fill::Black {
            // A border as thick as the box fills it.
            let _ = writeln!(self.out, "^FO{x},{y}^GB{w},{h},{}^FS", w.min(h).max(1));
        }
        let content_h = r.dots(p.content.height_pt());
        let top = match p.valign {
            VAlign::Top => y,
            VAlign::Middle => y + h.saturating_sub(content_h) / 2,
        };
        self.text(&p.content, x, top, w);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::DocumentFamily;
    use crate::layout::{Cell, FlowItem, LabelPage, flow};

    fn geometry() -> PageGeometry {
        PageGeometry {
            width_pt: 72.0 * 4.0,
            height_pt: 72.0 * 6.0,
            margin_pt: 72.0 * 0.25,
        }
    }

    fn doc(pages: Vec<LabelPage>) -> LabelDocument {
        LabelDocument {
            name: "t".into(),
            family: DocumentFamily::Book,
            geometry: geometry(),
            flow: flow(pages),
        }
    }

    fn text_page(s: &str) -> LabelPage {
        LabelPage {
            blocks: vec![Block::Text(TextBlock::line(s, TextStyle::regular(10.0)))],
        }
    }

    fn render(d: &LabelDocument) -> String {
        String::from_utf8(ZplRenderer::new(203).render(d).unwrap()).unwrap()
    }

    #[test]
    fn points_to_dots() {
        let r = ZplRenderer::new(203);
        assert_eq!(r.dots(72.0), 203);
        assert_eq!(r.dots(0.0), 0);
        assert_eq!(ZplRenderer::new(300).dots(36.0), 150);
    }

    #[test]
    fn one_label_per_page() {
        let zpl = render(&doc(vec![text_page("a"), text_page("b"), text_page("c")]));
        assert_eq!(zpl.matches("^XA").count(), 3);
        assert_eq!(zpl.matches("^XZ").count(), 3);
        assert!(zpl.starts_with("^XA\n^CI28\n^PW812\n^LL1218\n"));
        assert!(zpl.ends_with("^XZ\n"));
    }

    #[test]
    fn field_data_is_escaped() {
        assert_eq!(escape_field_data("A^B~C_D"), "A_5EB_7EC_5FD");
        assert_eq!(escape_field_data("Größe"), "Größe");
        let zpl = render(&doc(vec![text_page("X^Y")]));
        assert!(zpl.contains("^FH_^FDX_5EY^FS"));
    }

    #[test]
    fn empty_document_is_an_error() {
        let err = ZplRenderer::new(203).render(&doc(vec![])).unwrap_err();
        assert!(matches!(err, RenderError::EmptyDocument { .. }));
    }

    #[test]
    fn inverted_panel_draws_fill_and_reverse_text() {
        let panel = Block::Panel(PanelBlock {
            width_pt: 72.0,
            height_pt: 36.0,
            fill: Fill::Black,
            valign: VAlign::Middle,
            content: TextBlock::line("A1", TextStyle::bold(18.0).inverted()),
        });
        let zpl = render(&doc(vec![LabelPage {
            blocks: vec![panel],
        }]));
        assert!(zpl.contains("^GB203,102,102^FS"));
        assert!(zpl.contains("^FR^FDA1^FS"));
    }

    #[test]
    fn table_draws_grid_and_cells() {
        let style = TextStyle::regular(10.0);
        let table = Block::Table(TableBlock {
            column_widths_pt: vec![36.0, 36.0],
            rows: vec![
                vec![Cell::new("SKU", style), Cell::new("QTY", style)],
                vec![Cell::new("A1", style), Cell::new("20", style)],
            ],
            border: Some(crate::layout::Border {
                outer_pt: 1.0,
                inner_pt: 0.5,
            }),
        });
        let zpl = render(&doc(vec![LabelPage {
            blocks: vec![table],
        }]));
        // outer box, one column rule, one row rule
        assert_eq!(zpl.matches("^GB").count(), 3);
        for cell in ["SKU", "QTY", "A1", "20"] {
            assert!(zpl.contains(&format!("^FD{cell}^FS")), "missing {cell}");
        }
    }

    #[test]
    fn page_breaks_are_label_boundaries() {
        let d = doc(vec![text_page("a"), text_page("b")]);
        assert_eq!(
            d.flow
                .iter()
                .filter(|i| matches!(i, FlowItem::PageBreak))
                .count(),
            1
        );
        let zpl = render(&d);
        let labels: Vec<&str> = zpl.split("^XZ\n").filter(|s| !s.is_empty()).collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].contains("^FDa^FS"));
        assert!(labels[1].contains("^FDb^FS"));
    }
}
