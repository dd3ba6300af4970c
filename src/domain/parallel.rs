//! Parallel executor.
//!
//! A fixed-size rayon pool is built for the run and dropped when it ends.
//! Every worker computes one descriptor against the same read-only snapshot
//! of the frame taken before the run starts and hands its columns back by
//! value. The coordinator then names and appends the results in descriptor
//! order, checking collisions against the snapshot plus everything already
//! merged in this run.
//!
//! A descriptor that reads a column produced by another descriptor of the
//! same run will not find it in the snapshot and fails with `MissingColumn`.

use crate::domain::context::{ExecutionContext, evaluate};
use crate::domain::error::{IndicatorError, StudyError};
use crate::domain::indicator::Output;
use crate::domain::naming::resolve;
use crate::domain::study::Study;
use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::debug;

type WorkerResult = (Result<Vec<Output>, IndicatorError>, Duration);

/// Returns (columns added, elapsed). `cores` must be greater than one.
pub fn run(
    study: &Study,
    ctx: &mut ExecutionContext<'_>,
    cores: usize,
) -> Result<(usize, Duration), StudyError> {
    if cores <= 1 {
        return Err(StudyError::WorkerPool {
            reason: format!("parallel execution needs more than one worker, got {}", cores),
        });
    }
    let start = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cores)
        .build()
        .map_err(|e| StudyError::WorkerPool {
            reason: e.to_string(),
        })?;

    let snapshot = ctx.frame.clone();
    let registry = ctx.registry;
    let results: Vec<WorkerResult> = pool.install(|| {
        study
            .descriptors()
            .par_iter()
            .map(|descriptor| {
                let started = Instant::now();
                debug!(indicator = %descriptor, "running indicator");
                (evaluate(registry, descriptor, &snapshot), started.elapsed())
            })
            .collect()
    });
    drop(pool);

    let mut added = 0;
    for (descriptor, (outputs, elapsed)) in study.descriptors().iter().zip(results) {
        let frame = &*ctx.frame;
        let strict = ctx.strict();
        let resolved = outputs.and_then(|outputs| resolve(descriptor, outputs, frame, strict));
        added += ctx.commit(descriptor, resolved, elapsed);
    }

    Ok((added, start.elapsed()))
}
