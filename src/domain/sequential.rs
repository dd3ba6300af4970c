//! Sequential executor.
//!
//! Runs descriptors strictly in order and appends each result before the next
//! descriptor starts, so a later descriptor can read a column produced earlier
//! in the same run.

use crate::domain::context::{ExecutionContext, evaluate};
use crate::domain::naming::resolve;
use crate::domain::study::Study;
use std::time::{Duration, Instant};
use tracing::debug;

/// Returns (columns added, elapsed).
pub fn run(study: &Study, ctx: &mut ExecutionContext<'_>) -> (usize, Duration) {
    let start = Instant::now();
    let mut added = 0;

    for descriptor in study.descriptors() {
        let started = Instant::now();
        debug!(indicator = %descriptor, "running indicator");
        let frame = &*ctx.frame;
        let strict = ctx.strict();
        let resolved = evaluate(ctx.registry, descriptor, frame)
            .and_then(|outputs| resolve(descriptor, outputs, frame, strict));
        added += ctx.commit(descriptor, resolved, started.elapsed());
    }

    (added, start.elapsed())
}
