mod load;
mod render;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use boxlabel_core::{
    Aggregate, DEFAULT_BOOK_NAME, JsonRenderer, LabelDocument, LabelProfile, MalformedItemPolicy,
    PipelineConfig, PipelineError, Renderer, Stock, ZplRenderer, build_labels, normalized_rows,
    run,
};
use boxlabel_diagnostics::{self as diag, Diagnostic};
use boxlabel_profile::load_profile_from_str;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::load::{LoadedTable, inventory_rows, manifest_rows};
use crate::render::{Format, Sources, print_summary, render_diagnostics_pretty};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "boxlabel",
    version,
    about = "Normalize warehouse box manifests against inventory locations and print box labels"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Log more (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Validate both tables and report every problem found.
    Check {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Write the normalized record table as CSV.
    Normalize {
        #[command(flatten)]
        input: InputArgs,
        /// Output file; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Lay out and write label documents.
    Labels {
        #[command(flatten)]
        input: InputArgs,
        /// Directory for the documents (created if missing).
        #[arg(long)]
        out_dir: PathBuf,
        /// Which label families to write.
        #[arg(long, value_enum, default_value_t = LayoutArg::All)]
        layout: LayoutArg,
        /// Document encoding.
        #[arg(long, value_enum, default_value_t = DocFormat::Zpl)]
        format: DocFormat,
        /// Label stock preset.
        #[arg(long, value_enum, default_value_t = StockArg::Tall, conflicts_with = "profile")]
        stock: StockArg,
        /// Label profile JSON; overrides `--stock`.
        #[arg(long)]
        profile: Option<PathBuf>,
        /// File stem of the label book.
        #[arg(long, default_value = DEFAULT_BOOK_NAME)]
        book_name: String,
    },

    /// Explain a diagnostic ID (e.g. BXL2001).
    Explain { id: String },
}

/// Input tables and how to read them.
#[derive(Args, Debug)]
struct InputArgs {
    /// Box manifest CSV.
    #[arg(long)]
    manifest: PathBuf,
    /// Inventory CSV mapping SKUs to location codes.
    #[arg(long)]
    inventory: PathBuf,
    /// Manifest column holding the box number.
    #[arg(long, default_value = "Warehouse receipt code")]
    box_column: String,
    /// Manifest column holding the SKU list.
    #[arg(long, default_value = "Product SKU")]
    sku_list_column: String,
    /// Inventory column holding the location code.
    #[arg(long, default_value = "Stock Code")]
    location_column: String,
    /// Inventory column holding the SKU.
    #[arg(long, default_value = "Product Sku")]
    inventory_sku_column: String,
    /// What to do with SKU-list items that do not parse.
    #[arg(long, value_enum, default_value_t = OnMalformed::Fail)]
    on_malformed: OnMalformed,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnMalformed {
    /// Report every malformed item and stop.
    Fail,
    /// Drop malformed items with a warning.
    Skip,
}

impl From<OnMalformed> for MalformedItemPolicy {
    fn from(v: OnMalformed) -> Self {
        match v {
            OnMalformed::Fail => MalformedItemPolicy::Fail,
            OnMalformed::Skip => MalformedItemPolicy::Skip,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    /// Every family.
    All,
    /// One summary per box.
    Box,
    /// One label per SKU record.
    Sku,
    /// The label book.
    Book,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DocFormat {
    /// ZPL II for direct thermal printing.
    Zpl,
    /// Page-flow JSON for an external renderer.
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StockArg {
    /// 100 x 150 mm.
    Tall,
    /// 100 x 100 mm.
    Square,
}

impl From<StockArg> for Stock {
    fn from(s: StockArg) -> Self {
        match s {
            StockArg::Tall => Stock::Tall,
            StockArg::Square => Stock::Square,
        }
    }
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let format = Format::resolve_or_detect(cli.output.as_deref());

    if let Err(e) = dispatch(cli.cmd, format) {
        match format {
            Format::Json => {
                let out = serde_json::json!({
                    "ok": false,
                    "error": "command_failed",
                    "message": format!("{e:#}"),
                });
                let json = serde_json::to_string_pretty(&out)
                    .expect("error JSON serialization cannot fail");
                println!("{json}");
            }
            Format::Pretty => eprintln!("error: {e:#}"),
        }
        process::exit(1);
    }
}

fn dispatch(cmd: Cmd, format: Format) -> Result<()> {
    match cmd {
        Cmd::Check { input } => cmd_check(&input, format),
        Cmd::Normalize { input, out } => cmd_normalize(&input, out.as_deref(), format),
        Cmd::Labels {
            input,
            out_dir,
            layout,
            format: doc_format,
            stock,
            profile,
            book_name,
        } => {
            let profile = resolve_profile(profile.as_deref(), stock)?;
            let opts = LabelOptions {
                out_dir: &out_dir,
                layout,
                doc_format,
                book_name: &book_name,
            };
            cmd_labels(&input, &profile, &opts, format)
        }
        Cmd::Explain { id } => cmd_explain(&id, format),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

// ── Pipeline front end ──────────────────────────────────────────────────

/// Loaded tables plus the outcome of running the pipeline over them.
struct Loaded {
    manifest: LoadedTable,
    inventory: LoadedTable,
    outcome: Result<(Aggregate, Vec<Diagnostic>), PipelineError>,
}

impl Loaded {
    fn sources(&self) -> Sources<'_> {
        Sources {
            manifest: &self.manifest,
            inventory: &self.inventory,
        }
    }

    fn diagnostics(&self) -> Vec<Diagnostic> {
        match &self.outcome {
            Ok((_, diagnostics)) => diagnostics.clone(),
            Err(e) => e.diagnostics(),
        }
    }
}

fn load_and_run(input: &InputArgs) -> Result<Loaded> {
    let manifest = LoadedTable::read(&input.manifest)?;
    let inventory = LoadedTable::read(&input.inventory)?;
    let m_rows = manifest_rows(&manifest, &input.box_column, &input.sku_list_column)?;
    let i_rows = inventory_rows(
        &inventory,
        &input.inventory_sku_column,
        &input.location_column,
    )?;
    let config = PipelineConfig {
        malformed_items: input.on_malformed.into(),
    };
    let outcome = run(&m_rows, &i_rows, &config).map(|out| (out.aggregate, out.diagnostics));
    Ok(Loaded {
        manifest,
        inventory,
        outcome,
    })
}

/// Render diagnostics; on failure exit 1 before any output is written.
fn report_or_exit(loaded: &Loaded, format: Format) -> Result<()> {
    let diagnostics = loaded.diagnostics();
    if format == Format::Pretty {
        render_diagnostics_pretty(&diagnostics, &loaded.sources());
        print_summary(&diagnostics);
    }
    if loaded.outcome.is_err() {
        if format == Format::Json {
            let out = serde_json::json!({ "ok": false, "diagnostics": diagnostics });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        process::exit(1);
    }
    Ok(())
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_check(input: &InputArgs, format: Format) -> Result<()> {
    let loaded = load_and_run(input)?;
    report_or_exit(&loaded, format)?;
    let Ok((agg, diagnostics)) = &loaded.outcome else {
        return Ok(());
    };

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": true,
                "boxes": agg.box_count(),
                "skus": agg.sku_type_count(),
                "records": agg.records().len(),
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            eprintln!(
                "check ok: {} boxes, {} SKUs, {} records ({} manifest rows, {} inventory rows)",
                agg.box_count(),
                agg.sku_type_count(),
                agg.records().len(),
                loaded.manifest.len(),
                loaded.inventory.len(),
            );
        }
    }
    Ok(())
}

fn cmd_normalize(input: &InputArgs, out: Option<&Path>, format: Format) -> Result<()> {
    let loaded = load_and_run(input)?;
    report_or_exit(&loaded, format)?;
    let Ok((agg, diagnostics)) = &loaded.outcome else {
        return Ok(());
    };

    let rows = normalized_rows(agg);
    let writer: Box<dyn Write> = match out {
        Some(path) => Box::new(
            fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    let mut csv = csv::Writer::from_writer(writer);
    for row in &rows {
        csv.serialize(row)?;
    }
    csv.flush()?;

    match (format, out) {
        (Format::Json, Some(path)) => {
            let out = serde_json::json!({
                "ok": true,
                "rows": rows.len(),
                "out": path.display().to_string(),
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        // The CSV owns stdout, so diagnostics go to stderr.
        (Format::Json, None) => {
            eprintln!("{}", serde_json::to_string(diagnostics)?);
        }
        (Format::Pretty, _) => {
            if let Some(path) = out {
                eprintln!("wrote {} rows to {}", rows.len(), path.display());
            }
        }
    }
    Ok(())
}

struct LabelOptions<'a> {
    out_dir: &'a Path,
    layout: LayoutArg,
    doc_format: DocFormat,
    book_name: &'a str,
}

fn cmd_labels(
    input: &InputArgs,
    profile: &LabelProfile,
    opts: &LabelOptions<'_>,
    format: Format,
) -> Result<()> {
    let loaded = load_and_run(input)?;
    report_or_exit(&loaded, format)?;
    let Ok((agg, diagnostics)) = &loaded.outcome else {
        return Ok(());
    };

    let renderer: Box<dyn Renderer> = match opts.doc_format {
        DocFormat::Zpl => Box::new(ZplRenderer::new(profile.dpi)),
        DocFormat::Json => Box::new(JsonRenderer),
    };
    let set = build_labels(agg, profile, opts.book_name);
    let wants = |l: LayoutArg| opts.layout == LayoutArg::All || opts.layout == l;

    let mut written: Vec<PathBuf> = Vec::new();
    if wants(LayoutArg::Box) {
        let dir = opts.out_dir.join("box");
        written.extend(write_documents(&*renderer, &dir, &set.box_summaries)?);
    }
    if wants(LayoutArg::Sku) {
        let dir = opts.out_dir.join("sku");
        written.extend(write_documents(&*renderer, &dir, &set.single_labels)?);
    }
    if wants(LayoutArg::Book) {
        written.extend(write_documents(
            &*renderer,
            opts.out_dir,
            std::slice::from_ref(&set.book),
        )?);
    }

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": true,
                "profile": profile.id,
                "written": written.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            eprintln!(
                "wrote {} file(s) to {}",
                written.len(),
                opts.out_dir.display()
            );
        }
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let text = diag::explain(id);
            let out = serde_json::json!({
                "id": id,
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // The explanation is the command's output, so it goes to stdout.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{}: (no explanation available)", id);
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn resolve_profile(path: Option<&Path>, stock: StockArg) -> Result<LabelProfile> {
    match path {
        Some(p) => {
            let json = fs::read_to_string(p)
                .with_context(|| format!("failed to read profile {}", p.display()))?;
            load_profile_from_str(&json)
                .with_context(|| format!("invalid label profile {}", p.display()))
        }
        None => Ok(LabelProfile::preset(stock.into())),
    }
}

fn write_documents(
    renderer: &dyn Renderer,
    dir: &Path,
    docs: &[LabelDocument],
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    docs.iter()
        .map(|doc| {
            let path = dir.join(renderer.file_name(doc));
            let bytes = renderer
                .render(doc)
                .with_context(|| format!("failed to render {}", doc.name))?;
            fs::write(&path, bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::debug!(path = %path.display(), pages = doc.page_count(), "wrote document");
            Ok(path)
        })
        .collect()
}
