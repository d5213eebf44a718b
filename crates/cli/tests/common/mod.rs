//! Shared fixtures for `boxlabel` CLI tests.

#![allow(unreachable_pub)]

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use assert_cmd::cargo;

pub const MANIFEST_CSV: &str = "\
Warehouse receipt code,Product SKU,Notes
BOX001,20 x 4669059408; 9 x 4669069408,
BOX002,3 x 4669079408,fragile
";

pub const INVENTORY_CSV: &str = "\
Product Sku,Stock Code
4669059408,A123
4669069408,9Z
4669079408,B7
";

pub fn boxlabel() -> Command {
    Command::new(cargo::cargo_bin!("boxlabel"))
}

/// A temp dir holding `manifest.csv` and `inventory.csv`.
pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub manifest: PathBuf,
    pub inventory: PathBuf,
}

impl Fixture {
    pub fn new(manifest: &str, inventory: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let manifest_path = dir.path().join("manifest.csv");
        let inventory_path = dir.path().join("inventory.csv");
        fs::write(&manifest_path, manifest).expect("write manifest");
        fs::write(&inventory_path, inventory).expect("write inventory");
        Self {
            dir,
            manifest: manifest_path,
            inventory: inventory_path,
        }
    }

    pub fn sample() -> Self {
        Self::new(MANIFEST_CSV, INVENTORY_CSV)
    }

    /// `<cmd> --manifest .. --inventory ..` plus extra args.
    pub fn command(&self, cmd: &str, extra: &[&str]) -> Command {
        let mut c = boxlabel();
        c.arg(cmd)
            .arg("--manifest")
            .arg(&self.manifest)
            .arg("--inventory")
            .arg(&self.inventory)
            .args(extra);
        c
    }
}

#[allow(dead_code)]
pub fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("invalid json ({e}): {stdout}"))
}
