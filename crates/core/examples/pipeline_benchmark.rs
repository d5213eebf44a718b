//! Lightweight normalize/layout/render benchmark harness for local baselines.
//!
//! Run from repository root:
//! `cargo run -p boxlabel_core --example pipeline_benchmark --release`

use std::time::{Duration, Instant};

use boxlabel_core::{
    InventoryRow, LabelProfile, ManifestRow, PipelineConfig, Renderer, ZplRenderer, build_labels,
    run,
};

/// Synthetic manifest: `boxes` boxes of `per_box` SKUs each, SKUs shared
/// across boxes so the location map stays small.
fn synthetic(boxes: usize, per_box: usize) -> (Vec<ManifestRow>, Vec<InventoryRow>) {
    let manifest = (0..boxes)
        .map(|b| {
            let list = (0..per_box)
                .map(|s| format!("{} x SKU{:05}", s + 1, (b * 7 + s) % 500))
                .collect::<Vec<_>>()
                .join("; ");
            ManifestRow::new(format!("BOX{b:04}"), list)
        })
        .collect();
    let inventory = (0..500)
        .map(|s| InventoryRow::new(format!("SKU{s:05}"), format!("R{}", s % 40)))
        .collect();
    (manifest, inventory)
}

fn report(stage: &str, elapsed: Duration, iterations: usize) {
    println!(
        "  {stage:<10} total={elapsed:?}, per_iter={:.3} ms",
        elapsed.as_secs_f64() * 1000.0 / iterations as f64
    );
}

fn main() -> Result<(), String> {
    let iterations = std::env::var("BOXLABEL_BENCH_ITERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(50);

    let (manifest, inventory) = synthetic(200, 6);
    let config = PipelineConfig::default();
    let profile = LabelProfile::tall();
    let renderer = ZplRenderer::new(profile.dpi);

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = run(&manifest, &inventory, &config);
    }
    let normalize = start.elapsed();

    let output = run(&manifest, &inventory, &config).map_err(|e| e.to_string())?;

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = build_labels(&output.aggregate, &profile, "labels");
    }
    let layout = start.elapsed();

    let labels = build_labels(&output.aggregate, &profile, "labels");

    let start = Instant::now();
    let mut bytes = 0usize;
    for _ in 0..iterations {
        bytes = 0;
        for doc in labels.documents() {
            bytes += renderer.render(doc).map_err(|e| e.to_string())?.len();
        }
    }
    let render = start.elapsed();

    println!("Benchmark: {} boxes, {} records", manifest.len(), output.aggregate.records().len());
    report("normalize", normalize, iterations);
    report("layout", layout, iterations);
    report("render", render, iterations);
    println!("  zpl_bytes: {bytes}");
    Ok(())
}
