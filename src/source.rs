//! Source loading and normalization.

use std::fs;
use std::path::{Path, PathBuf};

/// Source text of one file, ready for analysis.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Normalized text handed to the complexity engine.
    pub text: String,
    /// Text as on disk, minus a BOM. Linters get this so their line numbers
    /// match the file.
    pub original: String,
    /// Line count of the file as read from disk.
    pub raw_lines: usize,
    /// Whether an interpreter directive was removed.
    pub had_shebang: bool,
}

impl SourceFile {
    /// Read and normalize a file.
    ///
    /// Returns `None` when nothing analyzable is left after normalization.
    pub fn load<P: AsRef<Path>>(path: P, noempty: bool) -> std::io::Result<Option<Self>> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        Ok(Self::from_text(path, &raw, noempty))
    }

    /// Normalize already-read text.
    pub fn from_text<P: AsRef<Path>>(path: P, raw: &str, noempty: bool) -> Option<Self> {
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
        let (body, had_shebang) = strip_shebang(raw);
        let text = if noempty {
            remove_blank_lines(body)
        } else {
            body.to_string()
        };

        if text.trim().is_empty() {
            return None;
        }

        Some(Self {
            path: path.as_ref().to_path_buf(),
            text,
            original: raw.to_string(),
            raw_lines: raw.lines().count(),
            had_shebang,
        })
    }
}

/// Remove a leading `#!` line.
pub fn strip_shebang(raw: &str) -> (&str, bool) {
    if !raw.starts_with("#!") {
        return (raw, false);
    }
    match raw.find('\n') {
        Some(idx) => (&raw[idx + 1..], true),
        None => ("", true),
    }
}

/// Drop whitespace-only lines.
pub fn remove_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Lines from the first to the last non-blank line, inclusive.
pub fn physical_lines(text: &str) -> usize {
    let lines: Vec<&str> = text.lines().collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    match (first, last) {
        (Some(first), Some(last)) => last - first + 1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shebang_is_removed() {
        let src = SourceFile::from_text("cli.js", "#!/usr/bin/env node\nvar a = 1;\n", false).unwrap();
        assert!(src.had_shebang);
        assert_eq!(src.text, "var a = 1;\n");
        assert_eq!(src.original, "#!/usr/bin/env node\nvar a = 1;\n");
        assert_eq!(src.raw_lines, 2);
    }

    #[test]
    fn test_shebang_only_file_is_empty() {
        assert!(SourceFile::from_text("cli.js", "#!/usr/bin/env node", false).is_none());
    }

    #[test]
    fn test_whitespace_file_is_empty() {
        assert!(SourceFile::from_text("empty.js", "\n   \n\t\n", false).is_none());
        assert!(SourceFile::from_text("empty.js", "", true).is_none());
    }

    #[test]
    fn test_noempty_drops_blank_lines() {
        let raw = "var a = 1;\n\n\nvar b = 2;\n   \nvar c = 3;\n";
        let kept = SourceFile::from_text("a.js", raw, false).unwrap();
        let dropped = SourceFile::from_text("a.js", raw, true).unwrap();
        assert_eq!(physical_lines(&kept.text), 6);
        assert_eq!(physical_lines(&dropped.text), 3);
        assert_eq!(dropped.text, "var a = 1;\nvar b = 2;\nvar c = 3;\n");
    }

    #[test]
    fn test_physical_lines_ignores_outer_blank_lines() {
        assert_eq!(physical_lines("\n\nfoo();\n\nbar();\n\n"), 3);
        assert_eq!(physical_lines(""), 0);
    }

    #[test]
    fn test_bom_is_ignored() {
        let src = SourceFile::from_text("bom.js", "\u{feff}#!/bin/node\nx();\n", false).unwrap();
        assert!(src.had_shebang);
        assert_eq!(src.text, "x();\n");
        assert_eq!(src.original, "#!/bin/node\nx();\n");
    }
}
