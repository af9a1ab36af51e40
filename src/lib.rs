//! jsaudit - static-analysis overview for JavaScript sources.
//!
//! jsaudit runs a chain of analyzers over every input file and folds the
//! results into per-file reports and a project-wide summary of source
//! lines, maintainability and lint issues.
//!
//! # Architecture
//!
//! - `resolve`: expands paths, directories and globs into an ordered file list
//! - `source`: reads files, strips `#!` lines and optionally blank lines
//! - `complexity`: the `ComplexityEngine` trait and a tree-sitter engine
//! - `lint`: the `Linter` trait with JSHint and ESLint adapters
//! - `inspect`: runs the chain per file in parallel and builds `FileReport`s
//! - `overview`: totals and averages across reports
//! - `report`: terminal, JSON and output-directory writers
//!
//! # Swapping engines
//!
//! `Inspector::complexity_engine` and `Inspector::linter` accept any
//! implementation of the respective trait.

pub mod cli;
pub mod complexity;
pub mod config;
pub mod inspect;
pub mod lint;
pub mod overview;
pub mod report;
pub mod resolve;
pub mod source;

pub use complexity::{ComplexityEngine, ComplexityReport, TreeSitterEngine};
pub use config::{ComplexityOptions, InspectOptions, LintChoice};
pub use inspect::{inspect, FileReport, Inspector};
pub use lint::{LintKind, LintReport, Linter};
pub use overview::{compute_overview, OverviewReport, Stats, Summary};
pub use resolve::resolve_inputs;
pub use source::SourceFile;
