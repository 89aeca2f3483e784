//! File system primitive consumed by the pipeline and the parser.
//!
//! Everything that touches the disk goes through [`FileSystem`], so tests and
//! embedders can substitute their own implementation.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use walkdir::WalkDir;

pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn is_directory(&self, path: &Path) -> bool;

    fn read_file(&self, path: &Path) -> io::Result<String>;

    fn file_size(&self, path: &Path) -> io::Result<u64>;

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Expand `pattern` (relative to `root`) into matching file paths,
    /// skipping anything matched by an `ignore` pattern.
    fn expand_glob(&self, pattern: &str, root: &Path, ignore: &[String]) -> Result<Vec<PathBuf>>;
}

/// Match options shared by include and ignore patterns: `*` stays within one
/// path segment, `**` crosses directories.
pub const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compile glob patterns, naming the offending pattern on failure.
pub fn compile_patterns(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns
        .iter()
        .map(|p| Pattern::new(p).with_context(|| format!("Invalid glob pattern: \"{}\"", p)))
        .collect()
}

/// True if `path`, taken relative to `root`, matches any pattern.
///
/// Directories above `root` never take part in the match.
pub fn matches_any(patterns: &[Pattern], path: &Path, root: &Path) -> bool {
    let rel = match path.strip_prefix(root) {
        Ok(rel) => rel.to_string_lossy().replace('\\', "/"),
        Err(_) => path.to_string_lossy().replace('\\', "/"),
    };
    patterns.iter().any(|p| p.matches_with(&rel, MATCH_OPTIONS))
}

/// [`FileSystem`] backed by the real disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_file(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn file_size(&self, path: &Path) -> io::Result<u64> {
        fs::metadata(path).map(|m| m.len())
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }

    fn expand_glob(&self, pattern: &str, root: &Path, ignore: &[String]) -> Result<Vec<PathBuf>> {
        let include = Pattern::new(pattern)
            .with_context(|| format!("Invalid glob pattern: \"{}\"", pattern))?;
        let ignore = compile_patterns(ignore)?;

        let mut files = Vec::new();
        // Unreadable entries are skipped; they cannot match anyway.
        for entry in WalkDir::new(root).sort_by_file_name().into_iter().flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Ok(rel) = path.strip_prefix(root) else {
                continue;
            };
            let rel = rel.to_string_lossy().replace('\\', "/");
            if !include.matches_with(&rel, MATCH_OPTIONS) {
                continue;
            }
            if matches_any(&ignore, path, root) {
                continue;
            }
            files.push(path.to_path_buf());
        }
        Ok(files)
    }
}
