//! Batch inspection: resolve inputs, analyze every file, collect reports.
//!
//! Files are analyzed in parallel. Reports come back in resolution order
//! regardless of which file finishes first. A file that fails analysis is
//! dropped (or degraded with `partial`) and never aborts the batch.
//!
//! There is no timeout: a linter that hangs stalls the whole batch.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::complexity::{ComplexityEngine, ComplexityReport, TreeSitterEngine};
use crate::config::InspectOptions;
use crate::lint::{self, LintReport, Linter};
use crate::resolve::{resolve_inputs, ResolveOptions};
use crate::source::{physical_lines, SourceFile};

/// Report for one analyzed file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub file_path: String,
    /// Line count as read from disk, before normalization.
    pub source_lines: usize,
    pub complexity: ComplexityReport,
    /// Present only when a linter was configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lint: Option<LintReport>,
}

impl FileReport {
    /// Assemble a report from the analyzer outputs.
    pub fn new(source: &SourceFile, complexity: ComplexityReport, lint: Option<LintReport>) -> Self {
        Self {
            file_path: source.path.to_string_lossy().to_string(),
            source_lines: source.raw_lines,
            complexity,
            lint,
        }
    }

    pub fn lint_issues(&self) -> usize {
        self.lint.as_ref().map(|l| l.issue_count()).unwrap_or(0)
    }
}

/// Runs the analyzer chain over a set of files.
pub struct Inspector {
    options: InspectOptions,
    complexity: Box<dyn ComplexityEngine>,
    linter: Option<Box<dyn Linter>>,
}

impl Inspector {
    /// Create an inspector using the built-in engine and the linter the
    /// options select.
    pub fn new(options: InspectOptions) -> Self {
        let complexity = Box::new(TreeSitterEngine::new(options.complexity.clone()));
        let linter = lint::for_choice(&options.lint_choice());
        Self {
            options,
            complexity,
            linter,
        }
    }

    /// Replace the complexity engine.
    pub fn complexity_engine(mut self, engine: Box<dyn ComplexityEngine>) -> Self {
        self.complexity = engine;
        self
    }

    /// Replace the linter. `None` disables linting.
    pub fn linter(mut self, linter: Option<Box<dyn Linter>>) -> Self {
        self.linter = linter;
        self
    }

    pub fn options(&self) -> &InspectOptions {
        &self.options
    }

    /// Resolve inputs (paths, directories, globs) and inspect them.
    pub fn run<S: AsRef<str>>(&self, inputs: &[S]) -> anyhow::Result<Vec<FileReport>> {
        let resolve_options = ResolveOptions {
            recurse: self.options.recurse,
            exclude: self.options.exclude.clone(),
        };
        let files = resolve_inputs(inputs, &resolve_options)?;
        Ok(self.inspect_files(&files))
    }

    /// Inspect resolved files. Order of the result follows `files`.
    pub fn inspect_files(&self, files: &[PathBuf]) -> Vec<FileReport> {
        log::info!(
            "inspecting {} file(s) with {}{}",
            files.len(),
            self.complexity.name(),
            self.linter
                .as_ref()
                .map(|l| format!(" and {}", l.kind()))
                .unwrap_or_default()
        );

        let reports: Vec<FileReport> = files
            .par_iter()
            .filter_map(|path| match self.inspect_file(path) {
                Ok(report) => report,
                Err(e) => {
                    log::warn!("skipping {}: {}", path.display(), e);
                    None
                }
            })
            .collect();

        log::info!("{} report(s) produced", reports.len());
        reports
    }

    /// Inspect one file. `Ok(None)` means the file was dropped.
    pub fn inspect_file(&self, path: &Path) -> anyhow::Result<Option<FileReport>> {
        let source = match SourceFile::load(path, self.options.noempty)? {
            Some(source) => source,
            None => {
                log::debug!("{} is empty, skipping", path.display());
                return Ok(None);
            }
        };

        let complexity = match self.complexity.analyze(&source) {
            Ok(report) => report,
            Err(e) if self.options.partial => {
                log::warn!("{}: {}, keeping partial report", path.display(), e);
                ComplexityReport::degraded(physical_lines(&source.text), e)
            }
            Err(e) => {
                log::warn!("{}: {}", path.display(), e);
                return Ok(None);
            }
        };

        let lint = self.linter.as_ref().map(|linter| {
            linter.lint(&source.path, &source.original).unwrap_or_else(|e| {
                log::warn!("{} failed on {}: {}", linter.kind(), path.display(), e);
                LintReport::failed(linter.kind(), e)
            })
        });

        Ok(Some(FileReport::new(&source, complexity, lint)))
    }
}

/// Inspect `inputs` and hand every report to `done`, once.
///
/// When `output_dir` is set the overview and per-file reports are written
/// there. `done` runs even if that write fails; the write error is returned
/// afterwards.
pub fn inspect<S, F>(
    inputs: &[S],
    output_dir: Option<&Path>,
    options: &InspectOptions,
    done: F,
) -> anyhow::Result<()>
where
    S: AsRef<str>,
    F: FnOnce(Vec<FileReport>),
{
    let reports = Inspector::new(options.clone()).run(inputs)?;
    let written = match output_dir {
        Some(dir) => {
            let overview = crate::overview::compute_overview(reports.clone());
            crate::report::write_output_dir(dir, &overview).inspect_err(|e| {
                log::warn!("could not write reports to {}: {}", dir.display(), e)
            })
        }
        None => Ok(()),
    };
    done(reports);
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complexity::AnalyzeError;
    use crate::lint::{LintError, LintKind};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct FailingEngine;

    impl ComplexityEngine for FailingEngine {
        fn analyze(&self, source: &SourceFile) -> Result<ComplexityReport, AnalyzeError> {
            Err(AnalyzeError::Parse(source.path.clone()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct BrokenLinter;

    impl Linter for BrokenLinter {
        fn kind(&self) -> LintKind {
            LintKind::Eslint
        }

        fn lint(&self, _path: &Path, _source: &str) -> Result<LintReport, LintError> {
            Err(LintError::NotFound("eslint".to_string()))
        }
    }

    /// Records the text it was asked to lint.
    #[derive(Default)]
    struct RecordingLinter {
        seen: Mutex<Vec<String>>,
    }

    impl Linter for Arc<RecordingLinter> {
        fn kind(&self) -> LintKind {
            LintKind::Jshint
        }

        fn lint(&self, _path: &Path, source: &str) -> Result<LintReport, LintError> {
            self.seen.lock().unwrap().push(source.to_string());
            Ok(LintReport::new(LintKind::Jshint, Vec::new()))
        }
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_inspect_file_without_linter() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "a.js", "var a = 1;\n\nvar b = 2;\n");

        let inspector = Inspector::new(InspectOptions::default());
        let report = inspector.inspect_file(&path).unwrap().unwrap();
        assert_eq!(report.source_lines, 3);
        assert_eq!(report.complexity.sloc.physical, 3);
        assert!(report.lint.is_none());
        assert_eq!(report.lint_issues(), 0);
    }

    #[test]
    fn test_parse_failure_drops_file() {
        let temp = TempDir::new().unwrap();
        let bad = write(temp.path(), "bad.js", "function (( {\n");
        let good = write(temp.path(), "good.js", "var ok = true;\n");

        let inspector = Inspector::new(InspectOptions::default());
        let reports = inspector.inspect_files(&[bad, good.clone()]);
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].file_path, good.to_string_lossy());
    }

    #[test]
    fn test_partial_keeps_degraded_report() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "a.js", "var a = 1;\n");

        let options = InspectOptions {
            partial: true,
            ..Default::default()
        };
        let inspector = Inspector::new(options).complexity_engine(Box::new(FailingEngine));
        let report = inspector.inspect_file(&path).unwrap().unwrap();
        assert!(report.complexity.is_degraded());
        assert_eq!(report.complexity.sloc.physical, 1);
    }

    #[test]
    fn test_linter_failure_keeps_lint_section() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "a.js", "var a = 1;\n");

        let inspector =
            Inspector::new(InspectOptions::default()).linter(Some(Box::new(BrokenLinter)));
        let report = inspector.inspect_file(&path).unwrap().unwrap();
        let lint = report.lint.unwrap();
        assert_eq!(lint.linter, LintKind::Eslint);
        assert_eq!(lint.issue_count(), 0);
        assert!(lint.error.is_some());
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let temp = TempDir::new().unwrap();
        let good = write(temp.path(), "good.js", "var ok = true;\n");
        let missing = temp.path().join("gone.js");

        let reports = Inspector::new(InspectOptions::default()).inspect_files(&[missing, good]);
        assert_eq!(reports.len(), 1);
    }

    #[test]
    fn test_inspect_calls_back_once_and_writes_output() {
        let temp = TempDir::new().unwrap();
        let a = write(temp.path(), "a.js", "var a = 1;\n");
        let out = temp.path().join("out");

        let mut calls = 0;
        let mut seen = 0;
        inspect(
            &[a.to_string_lossy().to_string()],
            Some(out.as_path()),
            &InspectOptions::default(),
            |reports| {
                calls += 1;
                seen = reports.len();
            },
        )
        .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(seen, 1);
        assert!(out.join("report.json").is_file());
    }

    #[test]
    fn test_callback_runs_when_output_dir_fails() {
        let temp = TempDir::new().unwrap();
        let a = write(temp.path(), "a.js", "var a = 1;\n");
        // A regular file where the output directory should go.
        let blocked = write(temp.path(), "out", "");

        let mut calls = 0;
        let result = inspect(
            &[a.to_string_lossy().to_string()],
            Some(blocked.as_path()),
            &InspectOptions::default(),
            |reports| {
                calls += 1;
                assert_eq!(reports.len(), 1);
            },
        );

        assert_eq!(calls, 1);
        assert!(result.is_err());
    }

    #[test]
    fn test_linter_sees_text_as_on_disk() {
        let temp = TempDir::new().unwrap();
        let raw = "#!/usr/bin/env node\n\nvar a = 1;\n";
        let path = write(temp.path(), "cli.js", raw);

        let linter = Arc::new(RecordingLinter::default());
        let options = InspectOptions {
            noempty: true,
            ..Default::default()
        };
        let report = Inspector::new(options)
            .linter(Some(Box::new(Arc::clone(&linter))))
            .inspect_file(&path)
            .unwrap()
            .unwrap();

        assert_eq!(report.complexity.sloc.physical, 1);
        assert_eq!(*linter.seen.lock().unwrap(), vec![raw.to_string()]);
    }
}
