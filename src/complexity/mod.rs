//! Complexity analysis.
//!
//! This module provides:
//! - `ComplexityEngine` trait: the capability the inspector calls per file
//! - `ComplexityReport`: the per-file result (sloc, cyclomatic, Halstead,
//!   maintainability, per-function breakdown)
//! - `TreeSitterEngine`: the built-in engine for JavaScript and TypeScript

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

mod halstead;
mod languages;
mod maintainability;
mod treesitter;

pub use halstead::HalsteadMetrics;
pub use languages::{language_for_path, SourceLanguage};
pub use maintainability::maintainability_index;
pub use treesitter::TreeSitterEngine;

use crate::source::SourceFile;

/// Errors from a complexity engine.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("no complexity analyzer for {0}")]
    UnsupportedLanguage(PathBuf),
    #[error("failed to parse {0}")]
    Parse(PathBuf),
    #[error("language setup failed: {0}")]
    Language(String),
    #[error("invalid query: {0}")]
    Query(String),
}

/// Line counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sloc {
    /// Lines spanned by the source, first to last non-blank line.
    pub physical: usize,
    /// Number of statements.
    pub logical: usize,
}

/// Metrics for one function, method or arrow function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionComplexity {
    pub name: String,
    /// Line number (1-indexed)
    pub line: usize,
    pub params: usize,
    pub cyclomatic: u32,
    pub sloc: Sloc,
}

/// Complexity results for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityReport {
    pub sloc: Sloc,
    pub cyclomatic: u32,
    pub halstead: HalsteadMetrics,
    pub maintainability: f64,
    #[serde(default)]
    pub functions: Vec<FunctionComplexity>,
    /// Feature flags the engine was run with.
    #[serde(default, rename = "ecmaFeatures", skip_serializing_if = "BTreeMap::is_empty")]
    pub ecma_features: BTreeMap<String, serde_json::Value>,
    /// Set when analysis failed and only line counts are known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ComplexityReport {
    /// A report for a file the engine could not analyze.
    pub fn degraded(physical: usize, error: impl ToString) -> Self {
        Self {
            sloc: Sloc {
                physical,
                logical: 0,
            },
            cyclomatic: 0,
            halstead: HalsteadMetrics::default(),
            maintainability: 0.0,
            functions: Vec::new(),
            ecma_features: BTreeMap::new(),
            error: Some(error.to_string()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// A complexity analyzer.
///
/// Implementations must be usable from several worker threads at once.
pub trait ComplexityEngine: Send + Sync {
    /// Analyze one normalized source file.
    fn analyze(&self, source: &SourceFile) -> Result<ComplexityReport, AnalyzeError>;

    /// Name used in logs.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degraded_report() {
        let report = ComplexityReport::degraded(12, AnalyzeError::Parse(PathBuf::from("bad.js")));
        assert!(report.is_degraded());
        assert_eq!(report.sloc.physical, 12);
        assert_eq!(report.maintainability, 0.0);
        assert_eq!(report.error.as_deref(), Some("failed to parse bad.js"));
    }

    #[test]
    fn test_report_json_field_names() {
        let report = ComplexityReport::degraded(3, "boom");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["sloc"]["physical"], 3);
        assert!(json.get("maintainability").is_some());
        assert!(json.get("ecmaFeatures").is_none());
    }
}
