//! Layout and document assembly tests.

mod common;

use boxlabel_core::layout::{
    Block, Corner, Fill, FlowItem, LabelPage, SplitCode, book_pages, box_summary_pages, paginate,
    single_record_pages, split_location_code,
};
use boxlabel_core::{DocumentFamily, LabelProfile, build_labels};
use common::{box001, interleaved};

fn text_lines(block: &Block) -> Vec<&str> {
    match block {
        Block::Text(t) => t.lines.iter().map(String::as_str).collect(),
        other => panic!("expected text block, got {other:?}"),
    }
}

fn table_rows(page: &LabelPage) -> Vec<Vec<&str>> {
    page.blocks
        .iter()
        .find_map(|b| match b {
            Block::Table(t) => Some(
                t.rows
                    .iter()
                    .map(|r| r.iter().map(|c| c.text.as_str()).collect())
                    .collect(),
            ),
            _ => None,
        })
        .expect("page has a table")
}

// ─── Box summary ─────────────────────────────────────────────────────────────

#[test]
fn box001_summary_has_one_page_with_two_records() {
    let pages = box_summary_pages(&box001(), &LabelProfile::tall());
    assert_eq!(pages.len(), 1);
    assert_eq!(text_lines(&pages[0].blocks[0]), vec!["BOX001 (1/1)"]);
    let rows = table_rows(&pages[0]);
    assert_eq!(rows.len() - 1, 2);
    assert_eq!(rows[0], vec!["SKU", "QTY", "Stock Code"]);
    assert_eq!(rows[1], vec!["4669059408", "20", "A123"]);
    assert_eq!(rows[2], vec!["4669069408", "9", "B7"]);
}

#[test]
fn summary_pages_follow_display_order() {
    let pages = box_summary_pages(&interleaved(), &LabelProfile::tall());
    let titles: Vec<&str> = pages.iter().map(|p| text_lines(&p.blocks[0])[0]).collect();
    assert_eq!(titles, vec!["ZZ-9 (1/3)", "AA-1 (2/3)", "MM-5 (3/3)"]);
    let first = table_rows(&pages[0]);
    let skus: Vec<&str> = first[1..].iter().map(|r| r[0]).collect();
    assert_eq!(skus, vec!["S1", "S2", "S3"]);
}

#[test]
fn location_header_dominates() {
    let profile = LabelProfile::tall();
    let pages = box_summary_pages(&box001(), &profile);
    let Some(Block::Table(t)) = pages[0].blocks.iter().find(|b| matches!(b, Block::Table(_))) else {
        panic!("no table");
    };
    let header = &t.rows[0];
    assert!(header[2].style.size_pt > header[0].style.size_pt);
    assert!(header[2].style.bold);
    assert_eq!(header[2].style.size_pt, profile.typography.location_header_pt);
}

// ─── Single labels ───────────────────────────────────────────────────────────

#[test]
fn single_pages_split_location_code() {
    let pages = single_record_pages(&box001(), &LabelProfile::tall());
    assert_eq!(pages.len(), 2);
    assert_eq!(text_lines(&pages[0].blocks[0]), vec!["BOX001 (1/1)"]);
    assert_eq!(text_lines(pages[0].blocks.last().unwrap()), vec!["A", "123"]);
    assert_eq!(text_lines(pages[1].blocks.last().unwrap()), vec!["B", "7"]);
}

#[test]
fn digits_then_letters_render_whole() {
    assert_eq!(split_location_code("9Z"), SplitCode::Whole("9Z"));
    let agg = interleaved();
    let pages = single_record_pages(&agg, &LabelProfile::tall());
    let idx = agg
        .records()
        .iter()
        .position(|r| r.location_code == "9Z")
        .unwrap();
    assert_eq!(text_lines(pages[idx].blocks.last().unwrap()), vec!["9Z"]);
}

// ─── Book ────────────────────────────────────────────────────────────────────

#[test]
fn book_has_one_page_per_record_with_badge() {
    let agg = interleaved();
    let pages = book_pages(&agg, &LabelProfile::tall());
    assert_eq!(pages.len(), agg.records().len());

    // MM-5 / S1 is the second SKU of the third box, which holds three.
    let page = &pages[5];
    assert_eq!(text_lines(&page.blocks[0]), vec!["MM-5"]);
    assert_eq!(text_lines(&page.blocks[2]), vec!["3 / 3"]);
    assert_eq!(table_rows(page)[0], vec!["SKU", "QTY", "Stock"]);

    let Some(Block::Overlay(o)) = page.blocks.last() else {
        panic!("book page must end with the badged code");
    };
    assert_eq!(o.anchor, Corner::TopRight);
    let (Block::Panel(base), Block::Panel(badge)) = (&*o.base, &*o.overlay) else {
        panic!("expected panels");
    };
    assert_eq!(base.fill, Fill::Black);
    assert!(base.content.style.inverted);
    assert_eq!(base.content.lines, vec!["A", "1"]);
    assert_eq!(badge.content.lines, vec!["2/3"]);
}

#[test]
fn pages_fit_their_stock() {
    for profile in [LabelProfile::tall(), LabelProfile::square()] {
        let usable = profile.page.usable_height_pt();
        let agg = box001();
        for page in single_record_pages(&agg, &profile)
            .iter()
            .chain(&book_pages(&agg, &profile))
        {
            assert!(
                page.content_height_pt() <= usable + 1e-6,
                "{}: {} > {}",
                profile.id,
                page.content_height_pt(),
                usable
            );
        }
    }
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[test]
fn documents_are_named_and_flowed() {
    let agg = interleaved();
    let set = build_labels(&agg, &LabelProfile::tall(), "labels");

    let summary: Vec<&str> = set.box_summaries.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(summary, vec!["ZZ-9", "AA-1", "MM-5"]);
    assert!(set.box_summaries.iter().all(|d| d.family == DocumentFamily::BoxSummary));

    assert_eq!(set.single_labels[0].name, "ZZ-9_S1_A1");
    assert_eq!(set.single_labels.len(), 7);

    assert_eq!(set.book.name, "labels");
    assert_eq!(set.book.page_count(), 7);
    assert!(!matches!(set.book.flow.last(), Some(FlowItem::PageBreak)));
    let breaks = set
        .book
        .flow
        .iter()
        .filter(|i| matches!(i, FlowItem::PageBreak))
        .count();
    assert_eq!(breaks, 6);
    assert_eq!(paginate(&set.book.flow).len(), 7);
}

#[test]
fn long_box_numbers_are_truncated_and_deduplicated() {
    let agg = common::aggregate_ok(
        &[
            ("SHIPMENT-2024-A", "1 x A"),
            ("SHIPMENT-2024-B", "1 x C"),
        ],
        &[("A", "1"), ("C", "3")],
    );
    let set = build_labels(&agg, &LabelProfile::square(), "book");
    let names: Vec<&str> = set.box_summaries.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["SHIPMENT-20", "SHIPMENT-20-2"]);
}

#[test]
fn ambiguous_single_label_names_stay_unique() {
    // A_B + C + D and A + B_C + D join to the same stem, and A + B + C_D-2
    // collides with the generated suffix.
    let agg = common::aggregate_ok(
        &[("A_B", "1 x C"), ("A", "1 x B_C; 1 x B")],
        &[("C", "D"), ("B_C", "D"), ("B", "C_D-2")],
    );
    let set = build_labels(&agg, &LabelProfile::tall(), "labels");
    let names: Vec<&str> = set.single_labels.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["A_B_C_D", "A_B_C_D-2", "A_B_C_D-2-2"]);
    let unique: std::collections::HashSet<&str> = names.iter().copied().collect();
    assert_eq!(unique.len(), names.len());
}

#[test]
fn layout_is_deterministic() {
    let profile = LabelProfile::tall();
    assert_eq!(
        build_labels(&interleaved(), &profile, "labels"),
        build_labels(&interleaved(), &profile, "labels")
    );
}
