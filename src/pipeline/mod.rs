//! The extraction pipeline template: discover → filter → process → aggregate.
//!
//! An analyzer implements [`Extractor`] (settings plus two hooks) and hands
//! itself to [`run`]. Every stage failure is caught here and returned as an
//! [`ExtractionResult::failure`]; per-file failures are logged and dropped.
//!
//! ## Module Structure
//!
//! - `discover`: candidate enumeration via the file system primitive
//! - `filter`: capability, size and directory filtering
//! - `process`: batched, optionally parallel, per-file processing
//! - `result`: `ExtractionResult` and its metadata

pub mod discover;
pub mod filter;
pub mod process;
pub mod result;

use std::{path::Path, time::Instant};

use anyhow::Result;

use crate::{core::context::ExecutionContext, error::ExtractionError};

pub use discover::FileCandidate;
pub use result::{BatchTiming, ExtractionMetadata, ExtractionResult};

/// Default include patterns: every JavaScript and TypeScript flavour.
pub const DEFAULT_PATTERNS: &[&str] = &["**/*.tsx", "**/*.ts", "**/*.jsx", "**/*.js"];

pub const DEFAULT_EXCLUDE: &[&str] = &["**/node_modules/**", "**/*.d.ts"];

pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules", "dist", "build", ".next", "coverage"];

/// 1 MiB.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;

pub const DEFAULT_BATCH_SIZE: usize = 50;

/// How a pipeline finds and schedules its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Include globs, relative to the target directory.
    pub patterns: Vec<String>,
    /// Ignore globs applied during discovery.
    pub exclude: Vec<String>,
    /// Files larger than this (bytes) are skipped with a warning.
    pub max_file_size: u64,
    pub batch_size: usize,
    pub parallel: bool,
    /// Directory names skipped anywhere below the target.
    pub excluded_dirs: Vec<String>,
    /// Directory names exempt from `excluded_dirs`.
    pub included_dirs: Vec<String>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            patterns: owned(DEFAULT_PATTERNS),
            exclude: owned(DEFAULT_EXCLUDE),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
            parallel: true,
            excluded_dirs: owned(DEFAULT_EXCLUDED_DIRS),
            included_dirs: Vec::new(),
        }
    }
}

/// The two hooks (and one optional capability check) an analyzer supplies to
/// the pipeline.
pub trait Extractor: Sync {
    /// Per-file result.
    type Item: Send;
    /// Aggregate produced once per run.
    type Summary;

    fn settings(&self) -> &PipelineSettings;

    /// Whether this extractor can handle `path` at all.
    fn accepts(&self, _path: &Path) -> bool {
        true
    }

    /// Extract from one file. `Ok(None)` skips the file.
    fn process_file(&self, path: &Path, ctx: &ExecutionContext) -> Result<Option<Self::Item>>;

    /// Reduce all per-file items to the summary.
    fn aggregate(
        &self,
        items: Vec<Self::Item>,
        target: &Path,
        ctx: &ExecutionContext,
    ) -> Result<Self::Summary>;
}

/// Run the full pipeline for `extractor` over `target`.
pub fn run<E: Extractor>(
    extractor: &E,
    target: &Path,
    ctx: &ExecutionContext,
) -> ExtractionResult<E::Summary> {
    let started = Instant::now();
    let mut metadata = ExtractionMetadata::default();

    let outcome = run_stages(extractor, target, ctx, &mut metadata);
    metadata.elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(summary) => ExtractionResult::success(summary, metadata),
        Err(e) => {
            ctx.logger().error(&e);
            ExtractionResult::failure(e, metadata)
        }
    }
}

fn run_stages<E: Extractor>(
    extractor: &E,
    target: &Path,
    ctx: &ExecutionContext,
    metadata: &mut ExtractionMetadata,
) -> Result<E::Summary, ExtractionError> {
    let logger = ctx.logger();
    let settings = extractor.settings();

    let candidates = discover::discover(target, settings, ctx)?;
    metadata.discovered = candidates.len();

    let candidates = filter::filter(
        candidates,
        target,
        settings,
        |path| extractor.accepts(path),
        logger,
    );
    metadata.filtered = candidates.len();
    logger.debug(format_args!(
        "Discovered {} files, {} after filtering",
        metadata.discovered, metadata.filtered
    ));

    let outcome = process::process(extractor, &candidates, ctx);
    metadata.processed = outcome.items.len();
    metadata.skipped = outcome.skipped;
    metadata.failed = outcome.failed;
    metadata.batches = outcome.batches;

    extractor
        .aggregate(outcome.items, target, ctx)
        .map_err(ExtractionError::Aggregate)
}
