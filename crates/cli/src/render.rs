//! Pretty diagnostic rendering using ariadne.
//!
//! Diagnostics that point at a table row are rendered against that CSV
//! file with the offending line underlined; the rest are printed as
//! standalone messages. JSON output is assembled by each command.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use boxlabel_diagnostics::{Diagnostic, Severity, Table};

use crate::load::LoadedTable;

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured terminal output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, else pretty on a TTY and JSON otherwise.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: &Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Warn => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        Severity::Info => Color::Blue,
        _ => Color::White,
    }
}

fn context_note(diag: &Diagnostic) -> Option<String> {
    diag.context.as_ref().filter(|c| !c.is_empty()).map(|ctx| {
        ctx.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ")
    })
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// The two input tables diagnostics can point into.
pub(crate) struct Sources<'a> {
    pub(crate) manifest: &'a LoadedTable,
    pub(crate) inventory: &'a LoadedTable,
}

/// Render diagnostics to stderr.
pub(crate) fn render_diagnostics_pretty(diagnostics: &[Diagnostic], sources: &Sources<'_>) {
    if diagnostics.is_empty() {
        return;
    }

    let config = Config::default()
        .with_compact(false)
        .with_color(io::stderr().is_terminal());

    // Build each Source once and reuse across all reports.
    let mut manifest_cache = (
        sources.manifest.name.as_str(),
        Source::from(sources.manifest.source.as_str()),
    );
    let mut inventory_cache = (
        sources.inventory.name.as_str(),
        Source::from(sources.inventory.source.as_str()),
    );

    for diag in diagnostics {
        let located = diag.origin.and_then(|origin| {
            let table = match origin.table {
                Table::Manifest => sources.manifest,
                Table::Inventory => sources.inventory,
            };
            table
                .row_span(origin.row)
                .map(|span| (origin.table, table.name.as_str(), span))
        });

        let Some((table, filename, span)) = located else {
            render_standalone(diag);
            continue;
        };

        let mut builder = Report::build(report_kind(&diag.severity), (filename, span.clone()))
            .with_code(diag.id.as_ref())
            .with_message(&diag.message)
            .with_config(config);

        let label_msg = context_note(diag).unwrap_or_else(|| diag.message.clone());
        builder = builder.with_label(
            Label::new((filename, span))
                .with_message(label_msg)
                .with_color(severity_color(&diag.severity)),
        );

        if let Some(explanation) = diag.explain() {
            builder = builder.with_help(explanation);
        }

        let report = builder.finish();
        match table {
            Table::Manifest => report.eprint(&mut manifest_cache).ok(),
            Table::Inventory => report.eprint(&mut inventory_cache).ok(),
        };
    }
}

/// Print a diagnostic with no source line.
fn render_standalone(diag: &Diagnostic) {
    use ariadne::Fmt;

    let kind_str = match diag.severity {
        Severity::Error => "error",
        Severity::Warn => "warning",
        Severity::Info => "info",
        _ => "diagnostic",
    };
    eprintln!(
        "{}[{}]: {}",
        kind_str.fg(severity_color(&diag.severity)),
        diag.id,
        diag.message
    );
    if let Some(origin) = diag.origin {
        eprintln!("  --> {origin}");
    }
    if let Some(note) = context_note(diag) {
        eprintln!("  = note: {note}");
    }
    if let Some(explanation) = diag.explain() {
        eprintln!("  = help: {explanation}");
    }
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured summary line showing error/warning/info counts.
///
/// Example: `2 errors, 1 warning, 1 info`
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    use ariadne::Fmt;

    let (mut errors, mut warnings, mut infos) = (0usize, 0usize, 0usize);
    for d in diagnostics {
        match d.severity {
            Severity::Error => errors += 1,
            Severity::Warn => warnings += 1,
            Severity::Info => infos += 1,
            _ => warnings += 1,
        }
    }

    if errors + warnings + infos == 0 {
        return;
    }

    let mut parts = Vec::new();
    if errors > 0 {
        let s = if errors == 1 { "" } else { "s" };
        parts.push(format!("{}", format!("{errors} error{s}").fg(Color::Red)));
    }
    if warnings > 0 {
        let s = if warnings == 1 { "" } else { "s" };
        parts.push(format!(
            "{}",
            format!("{warnings} warning{s}").fg(Color::Yellow)
        ));
    }
    if infos > 0 {
        parts.push(format!("{}", format!("{infos} info").fg(Color::Blue)));
    }
    eprintln!("{}", parts.join(", "));
}
