//! Per-run execution context and ledger.
//!
//! A context is created when a study starts and dropped when it ends. It holds
//! the dataset being augmented, the registry and options for the run, and an
//! append-only ledger with one entry per descriptor.

use crate::domain::descriptor::IndicatorDescriptor;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{IndicatorRegistry, Output};
use crate::domain::naming::Resolved;
use crate::domain::options::StudyOptions;
use crate::domain::params::bind;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Added {
        columns: Vec<String>,
        duplicates: Vec<String>,
    },
    Failed(IndicatorError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub kind: String,
    /// Descriptor as written, e.g. `sma(length=50)`.
    pub label: String,
    pub outcome: Outcome,
    pub elapsed: Duration,
}

impl LedgerEntry {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Outcome::Added { .. })
    }

    pub fn columns(&self) -> &[String] {
        match &self.outcome {
            Outcome::Added { columns, .. } => columns,
            Outcome::Failed(_) => &[],
        }
    }

    pub fn error(&self) -> Option<&IndicatorError> {
        match &self.outcome {
            Outcome::Failed(err) => Some(err),
            Outcome::Added { .. } => None,
        }
    }
}

pub struct ExecutionContext<'a> {
    pub frame: &'a mut Frame,
    pub registry: &'a IndicatorRegistry,
    pub options: &'a StudyOptions,
    ledger: Vec<LedgerEntry>,
}

impl<'a> ExecutionContext<'a> {
    pub fn new(
        frame: &'a mut Frame,
        registry: &'a IndicatorRegistry,
        options: &'a StudyOptions,
    ) -> Self {
        Self {
            frame,
            registry,
            options,
            ledger: Vec::new(),
        }
    }

    pub fn strict(&self) -> bool {
        self.options.strict_columns
    }

    /// Append resolved columns to the frame and record the outcome.
    pub fn commit(
        &mut self,
        descriptor: &IndicatorDescriptor,
        resolved: Result<Resolved, IndicatorError>,
        elapsed: Duration,
    ) -> usize {
        let strict = self.strict();
        let appended = resolved.and_then(|resolved| {
            let names = resolved.names();
            self.frame.concat(resolved.columns, strict)?;
            Ok((names, resolved.duplicates))
        });

        match appended {
            Ok((columns, duplicates)) => {
                let added = columns.len();
                debug!(
                    indicator = %descriptor,
                    columns = added,
                    elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                    "indicator complete"
                );
                if !duplicates.is_empty() {
                    warn!(indicator = %descriptor, ?duplicates, "duplicate column labels appended");
                }
                self.push(descriptor, Outcome::Added { columns, duplicates }, elapsed);
                added
            }
            Err(err) => {
                self.fail(descriptor, err, elapsed);
                0
            }
        }
    }

    pub fn fail(
        &mut self,
        descriptor: &IndicatorDescriptor,
        err: IndicatorError,
        elapsed: Duration,
    ) {
        if self.options.verbose {
            warn!(indicator = %descriptor, error = %err, "indicator failed");
        } else {
            debug!(indicator = %descriptor, error = %err, "indicator failed");
        }
        self.push(descriptor, Outcome::Failed(err), elapsed);
    }

    fn push(&mut self, descriptor: &IndicatorDescriptor, outcome: Outcome, elapsed: Duration) {
        self.ledger.push(LedgerEntry {
            kind: descriptor.key(),
            label: descriptor.to_string(),
            outcome,
            elapsed,
        });
    }

    pub fn ledger(&self) -> &[LedgerEntry] {
        &self.ledger
    }

    pub fn into_ledger(self) -> Vec<LedgerEntry> {
        self.ledger
    }
}

/// Resolve, bind and compute one descriptor against a read-only frame.
pub fn evaluate(
    registry: &IndicatorRegistry,
    descriptor: &IndicatorDescriptor,
    frame: &Frame,
) -> Result<Vec<Output>, IndicatorError> {
    let indicator = registry
        .resolve(&descriptor.kind)
        .ok_or_else(|| IndicatorError::UnknownKind(descriptor.kind.clone()))?;
    let args = bind(indicator.params(), &descriptor.params, &descriptor.kwargs)?;
    let outputs = indicator.compute(frame, &args)?;
    if outputs.is_empty() {
        return Err(IndicatorError::Computation(format!(
            "{} produced no columns",
            indicator.name()
        )));
    }
    Ok(outputs)
}
