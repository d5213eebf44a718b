//! Page builders for the box summary, single-label and book layouts.

use boxlabel_profile::{LabelProfile, POINTS_PER_MM, Typography};

use super::{
    Align, Block, Border, Cell, Corner, Fill, LabelPage, OverlayBlock, PageGeometry, PanelBlock,
    TableBlock, TextBlock, TextStyle, VAlign, split_location_code,
};
use crate::aggregate::{Aggregate, AggregatedRecord};

const GRID: Border = Border {
    outer_pt: 1.0,
    inner_pt: 0.5,
};

/// Badge distance from the corner of the big code region.
const BADGE_INSET_PT: f64 = 2.0;

/// `"<box_number> (<display_index>/<box_count>)"`.
pub fn box_title(box_number: &str, display_index: usize, box_count: usize) -> String {
    format!("{box_number} ({display_index}/{box_count})")
}

/// Header row with the location column set in the dominant size.
fn dominant_header(t: &Typography) -> Vec<Cell> {
    vec![
        Cell::new("SKU", TextStyle::bold(t.header_pt)),
        Cell::new("QTY", TextStyle::bold(t.header_pt)),
        Cell::new("Stock Code", TextStyle::bold(t.location_header_pt)),
    ]
}

fn record_row(r: &AggregatedRecord, size_pt: f64) -> Vec<Cell> {
    vec![
        Cell::new(r.sku.as_str(), TextStyle::regular(size_pt)),
        Cell::new(r.quantity.to_string(), TextStyle::regular(size_pt)),
        Cell::new(r.location_code.as_str(), TextStyle::bold(size_pt)),
    ]
}

fn equal_columns(width_pt: f64) -> Vec<f64> {
    vec![width_pt / 3.0; 3]
}

/// One page per distinct box, in display order.
///
/// Each page lists every record of the box as `(sku, quantity, location)`
/// under a title of the form `"BOX001 (1/3)"`.
pub fn box_summary_pages(agg: &Aggregate, profile: &LabelProfile) -> Vec<LabelPage> {
    let t = &profile.typography;
    let geometry = PageGeometry::from(&profile.page);
    let box_count = agg.box_count();

    let pages: Vec<LabelPage> = agg
        .boxes()
        .iter()
        .map(|b| {
            let mut rows = vec![dominant_header(t)];
            rows.extend(
                agg.records_for_box(&b.box_number)
                    .map(|r| record_row(r, t.body_pt)),
            );
            LabelPage {
                blocks: vec![
                    Block::Text(TextBlock::line(
                        box_title(&b.box_number, b.display_index, box_count),
                        TextStyle::regular(t.summary_title_pt),
                    )),
                    Block::spacer(2.0 * POINTS_PER_MM),
                    Block::Table(TableBlock {
                        column_widths_pt: equal_columns(geometry.usable_width_pt()),
                        rows,
                        border: Some(GRID),
                    }),
                ],
            }
        })
        .collect();

    tracing::debug!(pages = pages.len(), "laid out box summary labels");
    pages
}

/// Large-type location code lines.
fn big_code(code: &str, style: TextStyle, leading_pt: f64) -> TextBlock {
    TextBlock {
        lines: split_location_code(code)
            .lines()
            .into_iter()
            .map(str::to_string)
            .collect(),
        style,
        leading_pt,
    }
}

/// One page per record, in record order.
///
/// Title, a header + data table, then the location code in oversized bold
/// type (split into letters and digits when it has that shape).
pub fn single_record_pages(agg: &Aggregate, profile: &LabelProfile) -> Vec<LabelPage> {
    let t = &profile.typography;
    let geometry = PageGeometry::from(&profile.page);
    let box_count = agg.box_count();

    let pages: Vec<LabelPage> = agg
        .records()
        .iter()
        .map(|r| LabelPage {
            blocks: vec![
                Block::Text(TextBlock::line(
                    box_title(&r.box_number, r.box_display_index, box_count),
                    TextStyle::regular(t.title_pt),
                )),
                Block::spacer(8.0),
                Block::Table(TableBlock {
                    column_widths_pt: equal_columns(geometry.usable_width_pt()),
                    rows: vec![dominant_header(t), record_row(r, t.body_pt)],
                    border: Some(GRID),
                }),
                Block::spacer(20.0),
                Block::Text(big_code(
                    &r.location_code,
                    TextStyle::bold(t.big_code_pt),
                    t.big_code_leading_pt,
                )),
            ],
        })
        .collect();

    tracing::debug!(pages = pages.len(), "laid out single SKU labels");
    pages
}

/// The big code region of a book page with the `rank/count` badge laid
/// over its top-right corner.
fn badged_code(r: &AggregatedRecord, t: &Typography, geometry: &PageGeometry) -> OverlayBlock {
    let code = big_code(
        &r.location_code,
        TextStyle::bold(t.book_code_pt).inverted(),
        t.book_code_leading_pt,
    );
    let height_pt = (geometry.usable_height_pt() - t.book_reserved_pt).max(code.height_pt());
    let base = PanelBlock {
        width_pt: geometry.usable_width_pt(),
        height_pt,
        fill: Fill::Black,
        valign: VAlign::Middle,
        content: code,
    };
    let badge = PanelBlock {
        width_pt: t.badge_box_pt,
        height_pt: t.badge_box_pt,
        fill: Fill::Black,
        valign: VAlign::Top,
        content: TextBlock::line(
            format!("{}/{}", r.box_item_rank, r.box_sku_type_count),
            TextStyle::bold(t.badge_pt)
                .inverted()
                .aligned(Align::Right),
        ),
    };
    OverlayBlock {
        base: Box::new(Block::Panel(base)),
        overlay: Box::new(Block::Panel(badge)),
        anchor: Corner::TopRight,
        inset_pt: BADGE_INSET_PT,
    }
}

/// One book page per record, in record order.
///
/// Box number, `"index / count"`, a compact record table, then the location
/// code white on black with the per-box `rank/count` badge overlaid on the
/// code region's top-right corner.
pub fn book_pages(agg: &Aggregate, profile: &LabelProfile) -> Vec<LabelPage> {
    let t = &profile.typography;
    let geometry = PageGeometry::from(&profile.page);
    let width = geometry.usable_width_pt();
    let box_count = agg.box_count();

    let pages: Vec<LabelPage> = agg
        .records()
        .iter()
        .map(|r| {
            let header = ["SKU", "QTY", "Stock"]
                .into_iter()
                .map(|h| Cell::new(h, TextStyle::bold(t.body_pt)))
                .collect();
            LabelPage {
                blocks: vec![
                    Block::Text(TextBlock::line(
                        r.box_number.as_str(),
                        TextStyle::bold(t.title_pt),
                    )),
                    Block::spacer(6.0),
                    Block::Text(TextBlock::line(
                        format!("{} / {}", r.box_display_index, box_count),
                        TextStyle::bold(t.title_pt),
                    )),
                    Block::spacer(6.0),
                    Block::Table(TableBlock {
                        column_widths_pt: vec![width * 0.5, width * 0.2, width * 0.3],
                        rows: vec![header, record_row(r, t.body_pt)],
                        border: Some(GRID),
                    }),
                    Block::spacer(10.0),
                    Block::Overlay(badged_code(r, t, &geometry)),
                ],
            }
        })
        .collect();

    tracing::debug!(pages = pages.len(), "laid out label book");
    pages
}
