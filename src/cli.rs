//! Command-line interface for jsaudit.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::InspectOptions;
use crate::inspect::Inspector;
use crate::overview::compute_overview;
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Default option file names to search for.
const DEFAULT_CONFIG_NAMES: &[&str] = &["jsaudit.json", "jsaudit.yaml", ".jsaudit.yaml"];

/// Static-analysis overview for JavaScript sources.
///
/// Runs complexity analysis and, optionally, JSHint or ESLint over a set of
/// files and summarizes source lines, maintainability and lint issues.
#[derive(Parser)]
#[command(name = "jsaudit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze files, directories or glob patterns
    Inspect(InspectArgs),
    /// Print the overview of a previously written output directory
    Overview(OverviewArgs),
}

/// Arguments for the inspect command.
#[derive(Parser)]
pub struct InspectArgs {
    /// Files, directories or glob patterns
    #[arg(required = true)]
    pub inputs: Vec<String>,

    /// Options file, JSON or YAML (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Lint with JSHint
    #[arg(long)]
    pub jshint: bool,

    /// Lint with ESLint (wins over --jshint)
    #[arg(long)]
    pub eslint: bool,

    /// JSHint config file (implies --jshint)
    #[arg(short = 'l', long)]
    pub jshintrc: Option<PathBuf>,

    /// ESLint config file (implies --eslint)
    #[arg(short = 'e', long)]
    pub eslintrc: Option<PathBuf>,

    /// Ignore blank lines
    #[arg(short, long)]
    pub noempty: bool,

    /// Walk directories recursively
    #[arg(short, long)]
    pub recurse: bool,

    /// Regex of file paths to exclude
    #[arg(short = 'x', long)]
    pub exclude: Option<String>,

    /// Keep files that fail complexity analysis as partial reports
    #[arg(long)]
    pub partial: bool,

    /// Directory to write report.json and per-file reports into
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Arguments for the overview command.
#[derive(Parser)]
pub struct OverviewArgs {
    /// Output directory or its report.json
    pub path: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,
}

/// Map -v occurrences to a log filter.
pub fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    }
}

fn discover_config() -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

fn validate_format(format: &str) -> bool {
    if format != "pretty" && format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            format
        );
        return false;
    }
    true
}

/// Build options: file values first, flags on top.
pub fn build_options(args: &InspectArgs) -> anyhow::Result<InspectOptions> {
    let mut options = match args.config.clone().or_else(discover_config) {
        Some(path) => {
            log::debug!("loading options from {}", path.display());
            InspectOptions::parse_file(&path)
                .map_err(|e| anyhow::anyhow!("parsing {}: {}", path.display(), e))?
        }
        None => InspectOptions::default(),
    };

    options.jshint |= args.jshint || args.jshintrc.is_some();
    options.eslint |= args.eslint || args.eslintrc.is_some();
    options.noempty |= args.noempty;
    options.recurse |= args.recurse;
    options.partial |= args.partial;
    if args.exclude.is_some() {
        options.exclude = args.exclude.clone();
    }
    if args.jshintrc.is_some() {
        options.jshintrc = args.jshintrc.clone();
    }
    if args.eslintrc.is_some() {
        options.eslintrc = args.eslintrc.clone();
    }
    Ok(options)
}

/// Run the inspect command.
pub fn run_inspect(args: &InspectArgs) -> anyhow::Result<i32> {
    if !validate_format(&args.format) {
        return Ok(EXIT_ERROR);
    }

    let options = match build_options(args) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_ERROR);
        }
    };

    let reports = Inspector::new(options).run(&args.inputs)?;
    let overview = compute_overview(reports);

    if let Some(dir) = &args.dir {
        report::write_output_dir(dir, &overview)?;
    }

    match args.format.as_str() {
        "json" => report::write_json(&overview)?,
        _ => report::write_pretty(&overview),
    }

    if overview.reports.is_empty() {
        eprintln!("Warning: no files to analyze");
        return Ok(EXIT_FAILED);
    }
    Ok(EXIT_SUCCESS)
}

/// Run the overview command.
pub fn run_overview(args: &OverviewArgs) -> anyhow::Result<i32> {
    if !validate_format(&args.format) {
        return Ok(EXIT_ERROR);
    }

    let saved = report::load_overview(&args.path)?;
    // Recompute so hand-edited reports stay consistent.
    let overview = compute_overview(saved.reports);

    match args.format.as_str() {
        "json" => report::write_json(&overview)?,
        _ => report::write_pretty(&overview),
    }
    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LintChoice;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_parse_inspect_flags() {
        let cli = parse(&[
            "jsaudit", "-vv", "inspect", "src/*.js", "lib/a.js", "--eslint", "-n", "-r", "-x",
            "vendor", "-d", "out", "-f", "json",
        ]);
        assert_eq!(cli.verbose, 2);
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        assert_eq!(args.inputs, vec!["src/*.js", "lib/a.js"]);
        assert!(args.eslint && args.noempty && args.recurse);
        assert_eq!(args.exclude.as_deref(), Some("vendor"));
        assert_eq!(args.dir, Some(PathBuf::from("out")));
        assert_eq!(args.format, "json");
    }

    #[test]
    fn test_inspect_requires_inputs() {
        assert!(Cli::try_parse_from(["jsaudit", "inspect"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("opts.yaml");
        std::fs::write(&config, "jshint: true\nexclude: old\n").unwrap();

        let cli = parse(&[
            "jsaudit",
            "inspect",
            "a.js",
            "-c",
            config.to_str().unwrap(),
            "-e",
            ".eslintrc.json",
            "-x",
            "new",
        ]);
        let Commands::Inspect(args) = cli.command else {
            panic!("expected inspect");
        };
        let options = build_options(&args).unwrap();
        assert!(options.jshint);
        assert!(options.eslint);
        assert_eq!(options.exclude.as_deref(), Some("new"));
        assert!(matches!(options.lint_choice(), LintChoice::Eslint(_)));
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), log::LevelFilter::Warn);
        assert_eq!(log_level(1), log::LevelFilter::Info);
        assert_eq!(log_level(5), log::LevelFilter::Debug);
    }
}
