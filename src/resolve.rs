//! Input resolution: literal paths, directories and glob patterns.
//!
//! Resolution keeps the order of the inputs. Glob matches and directory
//! walks are sorted by file name so runs are reproducible. A file reached
//! twice, under any spelling, is only reported the first time. Entries the
//! walker cannot read are skipped with a warning.

use globset::GlobBuilder;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Extensions picked up when walking directories.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx"];

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "bower_components", "vendor"];

/// How inputs are expanded.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Walk directories given as inputs.
    pub recurse: bool,
    /// Regex of paths to leave out.
    pub exclude: Option<String>,
}

/// Expand inputs into an ordered, deduplicated list of existing files.
pub fn resolve_inputs<S: AsRef<str>>(
    inputs: &[S],
    options: &ResolveOptions,
) -> anyhow::Result<Vec<PathBuf>> {
    let exclude = options
        .exclude
        .as_deref()
        .map(Regex::new)
        .transpose()
        .map_err(|e| anyhow::anyhow!("invalid exclude pattern: {}", e))?;

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut files = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        let expanded = if is_glob(input) {
            expand_glob(input)?
        } else {
            expand_path(Path::new(input), options.recurse)?
        };

        for path in expanded {
            if let Some(re) = &exclude {
                if re.is_match(&path.to_string_lossy()) {
                    log::debug!("excluded {}", path.display());
                    continue;
                }
            }
            if seen.insert(dedup_key(&path)) {
                files.push(path);
            }
        }
    }

    log::debug!("resolved {} file(s) from {} input(s)", files.len(), inputs.len());
    Ok(files)
}

/// Identity of a file for deduplication. The canonical path when it can be
/// resolved, otherwise the path without `.` components.
fn dedup_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| {
        path.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    })
}

fn is_glob(input: &str) -> bool {
    input.contains(['*', '?', '[', '{'])
}

/// Expand a glob by walking its literal prefix directory.
fn expand_glob(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let meta_idx = pattern.find(['*', '?', '[', '{']).unwrap_or(pattern.len());
    let (base, rest) = match pattern[..meta_idx].rfind('/') {
        Some(0) => (PathBuf::from("/"), &pattern[1..]),
        Some(slash) => (PathBuf::from(&pattern[..slash]), &pattern[slash + 1..]),
        None => (PathBuf::from("."), pattern),
    };

    let matcher = GlobBuilder::new(rest)
        .literal_separator(true)
        .build()
        .map_err(|e| anyhow::anyhow!("invalid glob {:?}: {}", pattern, e))?
        .compile_matcher();

    if !base.is_dir() {
        log::warn!("glob base {} is not a directory", base.display());
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(&base).follow_links(true).sort_by_file_name();
    if !rest.contains("**") {
        walker = walker.max_depth(rest.split('/').count());
    }

    let mut files = Vec::new();
    for entry in walker {
        let Some(entry) = readable(entry) else {
            continue;
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(&base).unwrap_or(entry.path());
        if matcher.is_match(rel) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

/// Expand a literal path. Directories are walked only with `recurse`.
fn expand_path(path: &Path, recurse: bool) -> anyhow::Result<Vec<PathBuf>> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("{} does not exist, skipping", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(anyhow::anyhow!("checking {}: {}", path.display(), e)),
    };

    if metadata.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if !recurse {
        log::warn!("{} is a directory, pass --recurse to walk it", path.display());
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            if e.depth() > 0 && e.file_type().is_dir() {
                return !name.starts_with('.') && !SKIPPED_DIRS.contains(&name.as_ref());
            }
            true
        })
    {
        let Some(entry) = readable(entry) else {
            continue;
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let ext = entry.path().extension().and_then(|e| e.to_str()).unwrap_or("");
        if SOURCE_EXTENSIONS.contains(&ext) {
            files.push(entry.path().to_path_buf());
        }
    }
    Ok(files)
}

fn readable(entry: walkdir::Result<walkdir::DirEntry>) -> Option<walkdir::DirEntry> {
    match entry {
        Ok(entry) => Some(entry),
        Err(e) => {
            log::warn!("skipping unreadable entry: {}", e);
            None
        }
    }
}
