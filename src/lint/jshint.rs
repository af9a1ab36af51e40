//! JSHint adapter.
//!
//! Runs `jshint --verbose --filename <path> -` and parses the default
//! reporter's lines:
//!
//! ```text
//! lib/a.js: line 3, col 12, Missing semicolon. (W033)
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;
use std::process::Command;

use super::{
    find_tool, run_with_stdin, LintError, LintKind, LintMessage, LintReport, LintSeverity, Linter,
};
use crate::config::LinterConfig;

lazy_static! {
    static ref REPORT_LINE: Regex = Regex::new(
        r"^(?P<file>.+?): line (?P<line>\d+), col (?P<col>\d+), (?P<msg>.*?)(?: \((?P<code>[EWI]\d+)\))?$"
    )
    .unwrap();
}

/// JSHint linter.
pub struct JsHint {
    config: LinterConfig,
}

impl JsHint {
    pub fn new(config: LinterConfig) -> Self {
        Self { config }
    }
}

impl Linter for JsHint {
    fn kind(&self) -> LintKind {
        LintKind::Jshint
    }

    fn lint(&self, path: &Path, source: &str) -> Result<LintReport, LintError> {
        let bin = find_tool("jshint").ok_or_else(|| LintError::NotFound("jshint".to_string()))?;

        let mut command = Command::new(bin);
        command.arg("--verbose");
        if let Some(config) = &self.config.config_file {
            command.arg("--config").arg(config);
        }
        command.arg("--filename").arg(path).arg("-");

        let output = run_with_stdin(&mut command, source)?;

        // 0 = clean, 2 = issues found; anything else is a failure
        match output.status.code() {
            Some(0) | Some(2) => {}
            _ => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                return Err(LintError::ExecutionFailed(format!(
                    "jshint exited with {}: {}",
                    output.status,
                    stderr.trim()
                )));
            }
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(LintReport::new(LintKind::Jshint, parse_output(&stdout)))
    }
}

/// Parse reporter output into messages. Summary and blank lines are skipped.
pub(crate) fn parse_output(stdout: &str) -> Vec<LintMessage> {
    stdout
        .lines()
        .filter_map(|line| REPORT_LINE.captures(line.trim_end()))
        .map(|caps| {
            let code = caps.name("code").map(|c| c.as_str().to_string());
            let severity = match code.as_deref() {
                Some(c) if c.starts_with('E') => LintSeverity::Error,
                _ => LintSeverity::Warning,
            };
            LintMessage {
                severity,
                line: caps["line"].parse().unwrap_or(0),
                column: caps["col"].parse().unwrap_or(0),
                message: caps["msg"].to_string(),
                rule: code,
            }
        })
        .collect()
}
