//! Inspection options.
//!
//! Options can be loaded from a JSON or YAML file and are then overridden
//! by command-line flags. All keys are optional.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for one inspection run.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct InspectOptions {
    /// Lint with JSHint.
    pub jshint: bool,
    /// Lint with ESLint. Wins over `jshint` when both are set.
    pub eslint: bool,
    /// Drop blank lines before counting lines and analyzing.
    pub noempty: bool,
    /// Walk directories given as inputs.
    pub recurse: bool,
    /// Regex of paths to leave out.
    pub exclude: Option<String>,
    /// Config file passed to JSHint.
    pub jshintrc: Option<PathBuf>,
    /// Config file passed to ESLint.
    pub eslintrc: Option<PathBuf>,
    /// Keep files the complexity engine cannot parse as degraded reports.
    pub partial: bool,
    pub complexity: ComplexityOptions,
}

impl InspectOptions {
    /// Parse options from a JSON or YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let options: InspectOptions = serde_yaml::from_str(&content)?;
        Ok(options)
    }

    /// Resolve which linter runs for this batch.
    pub fn lint_choice(&self) -> LintChoice {
        if self.eslint {
            LintChoice::Eslint(LinterConfig {
                config_file: self.eslintrc.clone(),
            })
        } else if self.jshint {
            LintChoice::Jshint(LinterConfig {
                config_file: self.jshintrc.clone(),
            })
        } else {
            LintChoice::None
        }
    }
}

/// Options handed to the complexity engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ComplexityOptions {
    /// Count `&&`, `||` and `??` as decision points.
    pub logicalor: bool,
    /// Count each `case` as a decision point.
    pub switchcase: bool,
    /// Count `for..in` / `for..of` loops as decision points.
    pub forin: bool,
    /// Count `catch` clauses as decision points.
    pub trycatch: bool,
    /// Rescale maintainability to 0..100.
    pub newmi: bool,
    /// Language feature flags. Not validated here.
    #[serde(rename = "ecmaFeatures")]
    pub ecma_features: BTreeMap<String, serde_json::Value>,
}

impl Default for ComplexityOptions {
    fn default() -> Self {
        Self {
            logicalor: true,
            switchcase: true,
            forin: false,
            trycatch: false,
            newmi: true,
            ecma_features: BTreeMap::new(),
        }
    }
}

/// Settings for an external linter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinterConfig {
    pub config_file: Option<PathBuf>,
}

/// The single linter selected for a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LintChoice {
    None,
    Jshint(LinterConfig),
    Eslint(LinterConfig),
}
