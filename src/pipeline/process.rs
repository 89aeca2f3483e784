use std::{
    panic::{self, AssertUnwindSafe},
    path::Path,
    time::Instant,
};

use anyhow::{Result, anyhow};
use rayon::prelude::*;

use crate::{
    core::context::ExecutionContext,
    error::ExtractionError,
    pipeline::{Extractor, discover::FileCandidate, result::BatchTiming},
    utils::panic_message,
};

/// Items produced by the process stage, in discovery order.
#[derive(Debug)]
pub struct ProcessOutcome<T> {
    pub items: Vec<T>,
    /// Files whose hook returned `Ok(None)`.
    pub skipped: usize,
    /// Files whose hook returned an error or panicked.
    pub failed: usize,
    pub batches: Vec<BatchTiming>,
}

/// Run `process_file` over `files` in fixed-size batches.
///
/// A parallel batch is spread over the rayon pool and the next batch starts
/// only once every file of the current one has settled, so at most one batch
/// is in flight. Results are collected in input order either way.
pub fn process<E: Extractor>(
    extractor: &E,
    files: &[FileCandidate],
    ctx: &ExecutionContext,
) -> ProcessOutcome<E::Item> {
    let settings = extractor.settings();
    let logger = ctx.logger();
    let mut outcome = ProcessOutcome {
        items: Vec::with_capacity(files.len()),
        skipped: 0,
        failed: 0,
        batches: Vec::new(),
    };

    for (index, batch) in files.chunks(settings.batch_size.max(1)).enumerate() {
        let started = Instant::now();

        let results: Vec<_> = if settings.parallel {
            batch
                .par_iter()
                .map(|candidate| process_one(extractor, &candidate.path, ctx))
                .collect()
        } else {
            batch
                .iter()
                .map(|candidate| process_one(extractor, &candidate.path, ctx))
                .collect()
        };

        for (candidate, result) in batch.iter().zip(results) {
            match result {
                Ok(Some(item)) => outcome.items.push(item),
                Ok(None) => outcome.skipped += 1,
                Err(error) => {
                    outcome.failed += 1;
                    logger.warn(ExtractionError::Processing {
                        path: candidate.path.clone(),
                        error,
                    });
                }
            }
        }

        let timing = BatchTiming {
            index,
            files: batch.len(),
            elapsed_ms: started.elapsed().as_millis() as u64,
        };
        logger.debug(format_args!(
            "Batch {} processed {} files in {}ms",
            timing.index, timing.files, timing.elapsed_ms
        ));
        outcome.batches.push(timing);
    }

    outcome
}

/// A panic inside `process_file` is confined to its file.
fn process_one<E: Extractor>(
    extractor: &E,
    path: &Path,
    ctx: &ExecutionContext,
) -> Result<Option<E::Item>> {
    panic::catch_unwind(AssertUnwindSafe(|| extractor.process_file(path, ctx)))
        .unwrap_or_else(|payload| Err(anyhow!("panicked: {}", panic_message(&*payload))))
}
