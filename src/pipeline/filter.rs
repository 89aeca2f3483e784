use std::path::{Component, Path};

use crate::{logging::Logger, pipeline::PipelineSettings, pipeline::discover::FileCandidate};

/// True if any directory between `target` and `path` is excluded and not
/// explicitly re-included.
fn in_excluded_dir(path: &Path, target: &Path, settings: &PipelineSettings) -> bool {
    let rel = path.strip_prefix(target).unwrap_or(path);
    let Some(parent) = rel.parent() else {
        return false;
    };
    parent.components().any(|component| {
        let Component::Normal(name) = component else {
            return false;
        };
        let name = name.to_string_lossy();
        settings.excluded_dirs.iter().any(|d| d.as_str() == name.as_ref())
            && !settings.included_dirs.iter().any(|d| d.as_str() == name.as_ref())
    })
}

/// Narrow discovered candidates to the ones worth processing.
///
/// Drops files the extractor does not accept, files over the size limit
/// (with a warning) and files under excluded directories. The output is
/// always a subsequence of the input.
pub fn filter(
    candidates: Vec<FileCandidate>,
    target: &Path,
    settings: &PipelineSettings,
    accepts: impl Fn(&Path) -> bool,
    logger: &Logger,
) -> Vec<FileCandidate> {
    candidates
        .into_iter()
        .filter(|candidate| {
            if !accepts(&candidate.path) {
                return false;
            }
            if candidate.size > settings.max_file_size {
                logger.warn(format_args!(
                    "Skipping {} ({} bytes exceeds limit of {})",
                    candidate.path.display(),
                    candidate.size,
                    settings.max_file_size
                ));
                return false;
            }
            if in_excluded_dir(&candidate.path, target, settings) {
                logger.debug(format_args!(
                    "Skipping {} (excluded directory)",
                    candidate.path.display()
                ));
                return false;
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use crate::pipeline::filter::*;

    fn candidate(path: &str, size: u64) -> FileCandidate {
        let path = PathBuf::from(path);
        let extension = path.extension().map(|e| e.to_string_lossy().to_string());
        FileCandidate {
            path,
            size,
            extension,
        }
    }

    fn paths(files: &[FileCandidate]) -> Vec<&str> {
        files.iter().map(|c| c.path.to_str().unwrap()).collect()
    }

    #[test]
    fn test_filter_by_size_and_accepts() {
        let settings = PipelineSettings {
            max_file_size: 100,
            ..Default::default()
        };
        let files = vec![
            candidate("/p/a.tsx", 10),
            candidate("/p/big.tsx", 1000),
            candidate("/p/b.css", 10),
        ];

        let kept = filter(
            files,
            Path::new("/p"),
            &settings,
            |p| p.extension().is_some_and(|e| e == "tsx"),
            &Logger::default(),
        );
        assert_eq!(paths(&kept), vec!["/p/a.tsx"]);
    }

    #[test]
    fn test_filter_excluded_dirs_relative_to_target() {
        let settings = PipelineSettings {
            excluded_dirs: vec!["build".to_string(), "generated".to_string()],
            included_dirs: vec!["generated".to_string()],
            ..Default::default()
        };
        let files = vec![
            candidate("/work/build/app/src/a.tsx", 1),
            candidate("/work/build/app/build/b.tsx", 1),
            candidate("/work/build/app/generated/c.tsx", 1),
        ];

        // The target itself lives under "build"; only directories below it count.
        let kept = filter(
            files,
            Path::new("/work/build/app"),
            &settings,
            |_| true,
            &Logger::default(),
        );
        assert_eq!(
            paths(&kept),
            vec!["/work/build/app/src/a.tsx", "/work/build/app/generated/c.tsx"]
        );
    }

    #[test]
    fn test_filter_file_named_like_excluded_dir_is_kept() {
        let settings = PipelineSettings {
            excluded_dirs: vec!["dist".to_string()],
            ..Default::default()
        };
        let kept = filter(
            vec![candidate("/p/dist", 1)],
            Path::new("/p"),
            &settings,
            |_| true,
            &Logger::default(),
        );
        assert_eq!(kept.len(), 1);
    }
}
