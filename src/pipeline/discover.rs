use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use crate::{core::context::ExecutionContext, error::ExtractionError, pipeline::PipelineSettings};

/// A file selected for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub size: u64,
    pub extension: Option<String>,
}

impl FileCandidate {
    fn from_path(path: PathBuf, ctx: &ExecutionContext) -> Self {
        let size = match ctx.fs().file_size(&path) {
            Ok(size) => size,
            Err(e) => {
                ctx.logger()
                    .debug(format_args!("Cannot stat {}: {}", path.display(), e));
                0
            }
        };
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_string);
        Self {
            path,
            size,
            extension,
        }
    }
}

/// Find every candidate file under `target`.
///
/// A directory target expands each include pattern (skipping the exclude
/// patterns) and returns the de-duplicated union in path order. A file target
/// yields itself.
pub fn discover(
    target: &Path,
    settings: &PipelineSettings,
    ctx: &ExecutionContext,
) -> Result<Vec<FileCandidate>, ExtractionError> {
    let fs = ctx.fs();
    if !fs.exists(target) {
        return Err(ExtractionError::TargetNotFound(target.to_path_buf()));
    }

    if !fs.is_directory(target) {
        return Ok(vec![FileCandidate::from_path(target.to_path_buf(), ctx)]);
    }

    let mut paths = BTreeSet::new();
    for pattern in &settings.patterns {
        let matched = fs
            .expand_glob(pattern, target, &settings.exclude)
            .map_err(ExtractionError::Discovery)?;
        paths.extend(matched);
    }

    Ok(paths
        .into_iter()
        .map(|path| FileCandidate::from_path(path, ctx))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use crate::pipeline::discover::*;

    fn settings(patterns: &[&str], exclude: &[&str]) -> PipelineSettings {
        PipelineSettings {
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_discover_skips_excluded_patterns() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("node_modules/lib")).unwrap();
        fs::write(root.join("App.tsx"), "a").unwrap();
        fs::write(root.join("src/Button.tsx"), "b").unwrap();
        fs::write(root.join("node_modules/lib/Vendor.tsx"), "c").unwrap();

        let ctx = ExecutionContext::new(root);
        let found = discover(
            root,
            &settings(&["**/*.tsx"], &["**/node_modules/**"]),
            &ctx,
        )
        .unwrap();

        let paths: Vec<PathBuf> = found.into_iter().map(|c| c.path).collect();
        assert_eq!(paths, vec![root.join("App.tsx"), root.join("src/Button.tsx")]);
    }

    #[test]
    fn test_excludes_ignore_directories_above_the_target() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("build/app");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("build")).unwrap();
        fs::write(root.join("src/App.tsx"), "a").unwrap();
        fs::write(root.join("build/Bundle.tsx"), "b").unwrap();

        let ctx = ExecutionContext::new(&root);
        let found = discover(&root, &settings(&["**/*.tsx"], &["**/build/**"]), &ctx).unwrap();

        let paths: Vec<PathBuf> = found.into_iter().map(|c| c.path).collect();
        assert_eq!(paths, vec![root.join("src/App.tsx")]);
    }

    #[test]
    fn test_discover_deduplicates_overlapping_patterns() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("App.tsx"), "abc").unwrap();

        let ctx = ExecutionContext::new(root);
        let found = discover(root, &settings(&["**/*.tsx", "*.tsx"], &[]), &ctx).unwrap();

        assert_eq!(
            found,
            vec![FileCandidate {
                path: root.join("App.tsx"),
                size: 3,
                extension: Some("tsx".to_string()),
            }]
        );
    }

    #[test]
    fn test_discover_single_file_target() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("notes.md");
        fs::write(&file, "hello").unwrap();

        let ctx = ExecutionContext::new(dir.path());
        let found = discover(&file, &settings(&["**/*.tsx"], &[]), &ctx).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].extension.as_deref(), Some("md"));
    }

    #[test]
    fn test_discover_missing_target() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let ctx = ExecutionContext::new(dir.path());

        let err = discover(&missing, &PipelineSettings::default(), &ctx).unwrap_err();
        assert!(matches!(err, ExtractionError::TargetNotFound(p) if p == missing));
    }

    #[test]
    fn test_discover_invalid_pattern() {
        let dir = tempdir().unwrap();
        let ctx = ExecutionContext::new(dir.path());
        let err = discover(dir.path(), &settings(&["[invalid"], &[]), &ctx).unwrap_err();
        assert!(err.to_string().contains("Invalid glob pattern"));
    }
}
