//! CLI tests for `boxlabel labels`.

mod common;

use std::fs;
use std::path::Path;

use common::{Fixture, stdout_json};

fn names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap_or_else(|e| panic!("read {}: {e}", dir.display()))
        .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn all_layouts_as_zpl() {
    let fx = Fixture::sample();
    let out = fx.dir.path().join("out");
    let output = fx
        .command(
            "labels",
            &["--output", "json", "--out-dir", out.to_str().unwrap()],
        )
        .output()
        .expect("run labels");

    assert!(output.status.success(), "{output:?}");
    let json = stdout_json(&output);
    assert_eq!(json["ok"], true);
    assert_eq!(json["profile"], "tall-100x150");
    assert_eq!(json["written"].as_array().map(Vec::len), Some(6));

    assert_eq!(names(&out.join("box")), vec!["BOX001.zpl", "BOX002.zpl"]);
    assert_eq!(
        names(&out.join("sku")),
        vec![
            "BOX001_4669059408_A123.zpl",
            "BOX001_4669069408_9Z.zpl",
            "BOX002_4669079408_B7.zpl",
        ]
    );
    let book = fs::read_to_string(out.join("labels.zpl")).expect("read book");
    assert_eq!(book.matches("^XA").count(), 3);
    assert!(book.contains("^FD1 / 2^FS"));
}

#[test]
fn book_only_as_json_on_square_stock() {
    let fx = Fixture::sample();
    let out = fx.dir.path().join("out");
    let output = fx
        .command(
            "labels",
            &[
                "--output",
                "json",
                "--out-dir",
                out.to_str().unwrap(),
                "--layout",
                "book",
                "--format",
                "json",
                "--stock",
                "square",
                "--book-name",
                "shipment-7",
            ],
        )
        .output()
        .expect("run labels");

    assert!(output.status.success(), "{output:?}");
    assert_eq!(names(&out), vec!["shipment-7.json"]);
    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("shipment-7.json")).unwrap()).unwrap();
    assert_eq!(doc["family"], "book");
    let breaks = doc["flow"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|i| i["flow"] == "page_break")
        .count();
    assert_eq!(breaks, 2);
}

#[test]
fn custom_profile_sets_dpi() {
    let fx = Fixture::sample();
    let profile = fx.dir.path().join("profile.json");
    fs::write(
        &profile,
        r#"{ "id": "zebra-300", "schema_version": "1.0.0", "dpi": 300,
             "page": { "width_mm": 100.0, "height_mm": 150.0, "margin_mm": 5.0 } }"#,
    )
    .unwrap();
    let out = fx.dir.path().join("out");
    let output = fx
        .command(
            "labels",
            &[
                "--output",
                "json",
                "--out-dir",
                out.to_str().unwrap(),
                "--layout",
                "box",
                "--profile",
                profile.to_str().unwrap(),
            ],
        )
        .output()
        .expect("run labels");

    assert!(output.status.success(), "{output:?}");
    assert_eq!(stdout_json(&output)["profile"], "zebra-300");
    let zpl = fs::read_to_string(out.join("box").join("BOX001.zpl")).unwrap();
    assert!(zpl.contains("^PW1181"), "{zpl}");
}

#[test]
fn invalid_profile_is_a_command_failure() {
    let fx = Fixture::sample();
    let profile = fx.dir.path().join("profile.json");
    fs::write(
        &profile,
        r#"{ "id": "bad", "schema_version": "1.0.0", "dpi": 50,
             "page": { "width_mm": 100.0, "height_mm": 150.0, "margin_mm": 5.0 } }"#,
    )
    .unwrap();
    let out = fx.dir.path().join("out");
    let output = fx
        .command(
            "labels",
            &[
                "--output",
                "json",
                "--out-dir",
                out.to_str().unwrap(),
                "--profile",
                profile.to_str().unwrap(),
            ],
        )
        .output()
        .expect("run labels");

    assert!(!output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["error"], "command_failed");
    assert!(
        json["message"].as_str().is_some_and(|m| m.contains("dpi")),
        "unexpected message: {}",
        json["message"]
    );
    assert!(!out.exists());
}

#[test]
fn failed_run_writes_no_labels() {
    let fx = Fixture::new(
        common::MANIFEST_CSV,
        "Product Sku,Stock Code\n4669059408,A123\n4669059408,A124\n",
    );
    let out = fx.dir.path().join("out");
    let output = fx
        .command(
            "labels",
            &["--output", "json", "--out-dir", out.to_str().unwrap()],
        )
        .output()
        .expect("run labels");

    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
}
