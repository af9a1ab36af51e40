//! External lint engines.
//!
//! Exactly one linter runs per batch, selected by `LintChoice`. Each
//! adapter shells out to the node tool, feeding the normalized source on
//! stdin, and converts its output into a `LintReport`.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use thiserror::Error;

mod eslint;
mod jshint;

pub use eslint::EsLint;
pub use jshint::JsHint;

use crate::config::LintChoice;

/// Error type for linter runs.
#[derive(Debug, Error)]
pub enum LintError {
    #[error("tool not found: {0}")]
    NotFound(String),
    #[error("tool execution failed: {0}")]
    ExecutionFailed(String),
    #[error("failed to parse tool output: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which linter produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintKind {
    Jshint,
    Eslint,
}

impl LintKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LintKind::Jshint => "jshint",
            LintKind::Eslint => "eslint",
        }
    }
}

impl std::fmt::Display for LintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Severity of a lint message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LintSeverity {
    Error,
    Warning,
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintMessage {
    pub severity: LintSeverity,
    pub line: usize,
    pub column: usize,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
}

/// Lint results for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintReport {
    pub linter: LintKind,
    pub messages: Vec<LintMessage>,
    /// Set when the linter could not be run for this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LintReport {
    pub fn new(linter: LintKind, messages: Vec<LintMessage>) -> Self {
        Self {
            linter,
            messages,
            error: None,
        }
    }

    /// A report for a run that failed.
    pub fn failed(linter: LintKind, error: impl ToString) -> Self {
        Self {
            linter,
            messages: Vec::new(),
            error: Some(error.to_string()),
        }
    }

    /// Errors plus warnings.
    pub fn issue_count(&self) -> usize {
        self.messages.len()
    }

    pub fn error_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == LintSeverity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.severity == LintSeverity::Warning)
            .count()
    }
}

/// A lint engine.
pub trait Linter: Send + Sync {
    fn kind(&self) -> LintKind;

    /// Lint one file. `source` is the normalized text, `path` is used for
    /// config lookup and messages.
    fn lint(&self, path: &Path, source: &str) -> Result<LintReport, LintError>;
}

/// Build the linter for a batch, if any.
pub fn for_choice(choice: &LintChoice) -> Option<Box<dyn Linter>> {
    match choice {
        LintChoice::None => None,
        LintChoice::Jshint(cfg) => Some(Box::new(JsHint::new(cfg.clone()))),
        LintChoice::Eslint(cfg) => Some(Box::new(EsLint::new(cfg.clone()))),
    }
}

/// Locate a node tool: project-local `node_modules/.bin` first, then PATH.
pub fn find_tool(name: &str) -> Option<PathBuf> {
    let local = Path::new("node_modules").join(".bin").join(name);
    if local.is_file() {
        return Some(local);
    }
    which::which(name).ok()
}

/// Run a command with `input` on stdin and collect its output.
pub(crate) fn run_with_stdin(command: &mut Command, input: &str) -> Result<Output, LintError> {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| LintError::ExecutionFailed("stdin not captured".to_string()))?;

    std::thread::scope(|scope| -> Result<Output, LintError> {
        let writer = scope.spawn(move || stdin.write_all(input.as_bytes()));
        let output = child.wait_with_output()?;
        match writer.join() {
            Ok(Ok(())) => Ok(output),
            // The tool may exit before reading everything; its output still counts.
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(output),
            Ok(Err(e)) => Err(LintError::Io(e)),
            Err(_) => Err(LintError::ExecutionFailed("stdin writer panicked".to_string())),
        }
    })
}
