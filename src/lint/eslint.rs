//! ESLint adapter.
//!
//! Runs `eslint --format json --stdin --stdin-filename <path>` and reads
//! the JSON result list.

use serde::Deserialize;
use std::path::Path;
use std::process::Command;

use super::{
    find_tool, run_with_stdin, LintError, LintKind, LintMessage, LintReport, LintSeverity, Linter,
};
use crate::config::LinterConfig;

/// ESLint linter.
pub struct EsLint {
    config: LinterConfig,
}

impl EsLint {
    pub fn new(config: LinterConfig) -> Self {
        Self { config }
    }
}

/// ESLint JSON output format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintFile {
    messages: Vec<EslintMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintMessage {
    rule_id: Option<String>,
    severity: u8, // 1 = warning, 2 = error
    message: String,
    #[serde(default)]
    line: usize,
    #[serde(default)]
    column: usize,
}

impl Linter for EsLint {
    fn kind(&self) -> LintKind {
        LintKind::Eslint
    }

    fn lint(&self, path: &Path, source: &str) -> Result<LintReport, LintError> {
        let bin = find_tool("eslint").ok_or_else(|| LintError::NotFound("eslint".to_string()))?;

        let mut command = Command::new(bin);
        command.arg("--format").arg("json");
        if let Some(config) = &self.config.config_file {
            command.arg("--config").arg(config);
        }
        command.arg("--stdin").arg("--stdin-filename").arg(path);

        let output = run_with_stdin(&mut command, source)?;

        // 0 = clean, 1 = issues found, 2 = config or internal error
        match output.status.code() {
            Some(0) | Some(1) => {}
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(LintError::ExecutionFailed(format!(
                    "eslint exited with {}: {}",
                    output.status,
                    stderr.trim()
                )));
            }
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(LintReport::new(LintKind::Eslint, parse_output(&stdout)?))
    }
}

pub(crate) fn parse_output(stdout: &str) -> Result<Vec<LintMessage>, LintError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() || trimmed == "[]" {
        return Ok(Vec::new());
    }

    let files: Vec<EslintFile> = serde_json::from_str(trimmed)
        .map_err(|e| LintError::ParseError(format!("failed to parse eslint output: {}", e)))?;

    Ok(files
        .into_iter()
        .flat_map(|file| file.messages)
        .map(|msg| LintMessage {
            severity: if msg.severity >= 2 {
                LintSeverity::Error
            } else {
                LintSeverity::Warning
            },
            line: msg.line,
            column: msg.column,
            message: msg.message,
            rule: msg.rule_id,
        })
        .collect())
}
