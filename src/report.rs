//! Output formatting for jsaudit results.
//!
//! Supports:
//! - Pretty: colored terminal table for human readability
//! - JSON: the overview report for programmatic consumption
//! - Output directory: `report.json` plus one `files/<id>/report.json` per file

use colored::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::overview::{OverviewReport, Stats};

// =============================================================================
// JSON / output directory
// =============================================================================

/// Write the overview as pretty JSON to stdout.
pub fn write_json(overview: &OverviewReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(overview)?;
    println!("{}", json);
    Ok(())
}

/// Write the overview and every per-file report below `dir`.
pub fn write_output_dir(dir: &Path, overview: &OverviewReport) -> anyhow::Result<()> {
    fs::create_dir_all(dir)
        .map_err(|e| anyhow::anyhow!("creating {}: {}", dir.display(), e))?;

    for report in &overview.reports {
        let file_dir = dir.join("files").join(file_id(&report.file_path));
        fs::create_dir_all(&file_dir)?;
        fs::write(
            file_dir.join("report.json"),
            serde_json::to_string_pretty(report)?,
        )?;
    }

    fs::write(
        dir.join("report.json"),
        serde_json::to_string_pretty(overview)?,
    )?;
    log::info!(
        "wrote {} file report(s) to {}",
        overview.reports.len(),
        dir.display()
    );
    Ok(())
}

/// Load an overview written by `write_output_dir`. Accepts the directory
/// or the `report.json` path.
pub fn load_overview(path: &Path) -> anyhow::Result<OverviewReport> {
    let file: PathBuf = if path.is_dir() {
        path.join("report.json")
    } else {
        path.to_path_buf()
    };
    let content = fs::read_to_string(&file)
        .map_err(|e| anyhow::anyhow!("reading {}: {}", file.display(), e))?;
    Ok(serde_json::from_str(&content)?)
}

/// Directory-safe identifier for a source path.
pub fn file_id(path: &str) -> String {
    let id: String = path
        .chars()
        .map(|c| match c {
            '/' | '\\' | '.' | ':' | ' ' => '_',
            c => c,
        })
        .collect();
    id.trim_start_matches('_').to_string()
}

// =============================================================================
// Pretty format
// =============================================================================

/// Print the overview as a colored table.
pub fn write_pretty(overview: &OverviewReport) {
    print!("{}", format_pretty(overview));
}

/// Render the overview table.
pub fn format_pretty(overview: &OverviewReport) -> String {
    let width = overview
        .reports
        .iter()
        .map(|r| r.file_path.len())
        .chain(std::iter::once("File".len()))
        .max()
        .unwrap_or(4);

    let mut lines = vec![
        String::new(),
        format!(
            "  {} v{}",
            "jsaudit".cyan().bold(),
            env!("CARGO_PKG_VERSION")
        ),
        String::new(),
    ];

    if overview.reports.is_empty() {
        lines.push(format!("  {}", "No files analyzed.".dimmed()));
        return lines.join("\n") + "\n";
    }

    lines.push(format!(
        "  {}",
        format!(
            "{:<width$}  {:>8}  {:>15}  {:>6}",
            "File",
            "SLOC",
            "Maintainability",
            "Lint",
            width = width
        )
        .dimmed()
    ));

    for report in &overview.reports {
        let lint = match &report.lint {
            Some(l) if l.error.is_some() => "n/a".dimmed().to_string(),
            Some(l) => colored_lint(l.issue_count() as f64, false),
            None => "-".dimmed().to_string(),
        };
        let mi = if report.complexity.is_degraded() {
            format!("{:>15}", "n/a").dimmed().to_string()
        } else {
            colored_maintainability(report.complexity.maintainability)
        };
        lines.push(format!(
            "  {:<width$}  {:>8}  {}  {:>6}",
            report.file_path,
            report.complexity.sloc.physical,
            mi,
            lint,
            width = width
        ));
    }

    lines.push(String::new());
    lines.push(stats_row("Total", &overview.summary.total, width, false));
    lines.push(stats_row("Average", &overview.summary.average, width, true));
    lines.push(String::new());
    lines.join("\n") + "\n"
}

fn stats_row(label: &str, stats: &Stats, width: usize, average: bool) -> String {
    let sloc = if average {
        format!("{:.0}", stats.sloc)
    } else {
        format!("{}", stats.sloc)
    };
    format!(
        "  {:<width$}  {:>8}  {}  {:>6}",
        label.bold(),
        sloc,
        colored_maintainability(stats.maintainability),
        colored_lint(stats.lint, average),
        width = width
    )
}

fn colored_maintainability(mi: f64) -> String {
    let text = format!("{:>15.2}", mi);
    match mi {
        mi if mi >= 85.0 => text.green().bold().to_string(),
        mi if mi >= 65.0 => text.green().to_string(),
        mi if mi >= 40.0 => text.yellow().to_string(),
        _ => text.red().to_string(),
    }
}

fn colored_lint(issues: f64, fractional: bool) -> String {
    let text = if fractional {
        format!("{:.2}", issues)
    } else {
        format!("{}", issues)
    };
    if issues == 0.0 {
        text.green().to_string()
    } else {
        text.yellow().to_string()
    }
}
