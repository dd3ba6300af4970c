//! Study dispatcher: the public entry point for running studies.
//!
//! Resolution turns a [`Selector`] into a concrete [`Study`], removes excluded
//! kinds, applies uniform parameter overrides, and checks every resolvable
//! descriptor's parameters and column selection before anything runs. Any
//! problem found there is a [`StudyError`] and nothing is appended.
//!
//! Routing picks the sequential executor when `ordered` is set, when fewer
//! than two workers are available, or when a descriptor reads a column the
//! frame does not have yet (a chained descriptor). Everything else runs on the
//! parallel executor.

use crate::domain::category::{Category, CategoryRegistry};
use crate::domain::context::{ExecutionContext, LedgerEntry, Outcome};
use crate::domain::descriptor::{ColNames, IndicatorDescriptor};
use crate::domain::error::StudyError;
use crate::domain::frame::Frame;
use crate::domain::indicator::IndicatorRegistry;
use crate::domain::options::StudyOptions;
use crate::domain::params::{NAMING_KEYS, bind, is_set};
use crate::domain::study::Study;
use crate::domain::{parallel, sequential};
use crate::ports::report_port::ReportPort;
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

/// What to run.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Selector {
    /// Every registered indicator, category by category.
    #[default]
    All,
    /// One category, matched case-insensitively. `"all"` selects everything.
    Category(String),
    Study(Study),
}

impl From<&str> for Selector {
    fn from(name: &str) -> Self {
        Selector::Category(name.to_string())
    }
}

impl From<Category> for Selector {
    fn from(category: Category) -> Self {
        Selector::Category(category.as_str().to_string())
    }
}

impl From<Study> for Selector {
    fn from(study: Study) -> Self {
        Selector::Study(study)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    Sequential,
    Parallel,
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionMode::Sequential => f.write_str("sequential"),
            ExecutionMode::Parallel => f.write_str("parallel"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StudyReport {
    pub name: String,
    pub mode: ExecutionMode,
    /// Workers used; 0 for a sequential run.
    pub cores: usize,
    pub added: usize,
    /// Labels appended to the frame, in order.
    pub columns: Vec<String>,
    pub elapsed: Duration,
    pub entries: Vec<LedgerEntry>,
    timed: bool,
}

impl StudyReport {
    pub fn failures(&self) -> Vec<&LedgerEntry> {
        self.entries.iter().filter(|e| !e.succeeded()).collect()
    }

    /// Labels appended while another column already carried them.
    pub fn duplicates(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match &e.outcome {
                Outcome::Added { duplicates, .. } => Some(duplicates),
                Outcome::Failed(_) => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// One aggregate line. Elapsed time is only included for timed runs.
    pub fn summary(&self) -> String {
        let mut line = format!("{}: {} columns added", self.name, self.added);
        if self.timed {
            line.push_str(&format!(" in {:.4} ms", self.elapsed.as_secs_f64() * 1000.0));
        }
        line
    }

    /// One line per descriptor, failures included with their error.
    pub fn verbose_lines(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| match &e.outcome {
                Outcome::Added { columns, .. } => format!("{}: {}", e.label, columns.join(", ")),
                Outcome::Failed(err) => format!("{}: failed: {}", e.label, err),
            })
            .collect()
    }

    /// Send this run's (label, columns, elapsed) to a reporting sink.
    pub fn report_to(&self, sink: &mut dyn ReportPort) {
        sink.record(&self.name, self.added, self.elapsed);
    }
}

pub struct StudyEngine {
    registry: IndicatorRegistry,
    categories: CategoryRegistry,
}

impl StudyEngine {
    pub fn new(registry: IndicatorRegistry) -> Self {
        let categories = CategoryRegistry::from_indicators(&registry);
        Self {
            registry,
            categories,
        }
    }

    /// Engine over the built-in indicator catalog.
    pub fn builtin() -> Result<Self, StudyError> {
        Ok(Self::new(IndicatorRegistry::builtin()?))
    }

    pub fn registry(&self) -> &IndicatorRegistry {
        &self.registry
    }

    pub fn categories(&self) -> &CategoryRegistry {
        &self.categories
    }

    /// Resolve a selector into the study that would run, with exclusions and
    /// overrides applied and every resolvable descriptor checked.
    pub fn resolve(
        &self,
        selector: Selector,
        options: &StudyOptions,
    ) -> Result<Study, StudyError> {
        let base = match selector {
            Selector::All => Study::all(&self.categories)?,
            Selector::Category(name) if name.trim().eq_ignore_ascii_case("all") => {
                Study::all(&self.categories)?
            }
            Selector::Category(name) => Study::category(&self.categories, &name)?,
            Selector::Study(study) => {
                study.validate()?;
                study
            }
        };

        let ta: Vec<IndicatorDescriptor> = base
            .descriptors()
            .iter()
            .filter(|d| !options.is_excluded(&d.kind))
            .map(|d| self.apply_overrides(d, options))
            .collect();
        if ta.is_empty() {
            return Err(StudyError::EmptyStudy { name: base.name });
        }

        for descriptor in &ta {
            self.check(descriptor)?;
        }
        Ok(base.derive(ta))
    }

    fn apply_overrides(
        &self,
        descriptor: &IndicatorDescriptor,
        options: &StudyOptions,
    ) -> IndicatorDescriptor {
        let mut out = descriptor.clone();
        let Some(indicator) = self.registry.resolve(&descriptor.kind) else {
            return out;
        };
        let specs = indicator.params();
        for (name, value) in &options.overrides {
            let name_str = name.as_str();
            let declared =
                specs.iter().any(|s| s.name == name_str) || NAMING_KEYS.contains(&name_str);
            if declared && !is_set(specs, &descriptor.params, &descriptor.kwargs, name) {
                out.kwargs.insert(name.clone(), value.clone());
            }
        }
        out
    }

    /// Parameter and column-selection checks for one descriptor. Unknown kinds
    /// pass here and fail individually at run time.
    fn check(&self, descriptor: &IndicatorDescriptor) -> Result<(), StudyError> {
        let Some(indicator) = self.registry.resolve(&descriptor.kind) else {
            return Ok(());
        };
        bind(indicator.params(), &descriptor.params, &descriptor.kwargs)
            .map_err(|e| e.into_study_error(&descriptor.kind))?;

        let arity = indicator.arity();
        let mut selected = arity;
        if let Some(numbers) = &descriptor.col_numbers {
            if let Some(bad) = numbers.iter().find(|&&n| n >= arity) {
                return Err(StudyError::InvalidColumnNumbers {
                    kind: descriptor.kind.clone(),
                    reason: format!("index {} out of range for {} columns", bad, arity),
                });
            }
            selected = numbers.len();
        }
        if let Some(ColNames::Many(names)) = &descriptor.col_names {
            if names.len() > selected {
                return Err(StudyError::InvalidColumnNames {
                    kind: descriptor.kind.clone(),
                    reason: format!("{} names for {} columns", names.len(), selected),
                });
            }
        }
        Ok(())
    }

    /// Whether any descriptor reads an input column the frame does not have.
    fn is_chained(&self, study: &Study, frame: &Frame) -> bool {
        study.descriptors().iter().any(|descriptor| {
            let Some(indicator) = self.registry.resolve(&descriptor.kind) else {
                return false;
            };
            bind(indicator.params(), &descriptor.params, &descriptor.kwargs)
                .map(|args| {
                    args.input_columns(indicator.params())
                        .iter()
                        .any(|c| !frame.contains(c))
                })
                .unwrap_or(false)
        })
    }

    /// Run a study against `frame`, appending the resulting columns in place.
    pub fn study(
        &self,
        frame: &mut Frame,
        selector: impl Into<Selector>,
        options: &StudyOptions,
    ) -> Result<StudyReport, StudyError> {
        let study = self.resolve(selector.into(), options)?;
        let cores = study.cores.unwrap_or(options.cores);
        let chained = self.is_chained(&study, frame);

        let mode = if options.ordered || cores <= 1 || (chained && !options.force_parallel) {
            ExecutionMode::Sequential
        } else {
            ExecutionMode::Parallel
        };
        if chained && mode == ExecutionMode::Parallel {
            warn!(study = %study.name, "chained descriptors forced onto parallel execution");
        }
        info!(
            study = %study.name,
            indicators = study.len(),
            mode = %mode,
            cores,
            "study started"
        );

        let start_columns = frame.shape().1;
        let mut ctx = ExecutionContext::new(frame, &self.registry, options);
        let (added, elapsed) = match mode {
            ExecutionMode::Sequential => sequential::run(&study, &mut ctx),
            ExecutionMode::Parallel => parallel::run(&study, &mut ctx, cores)?,
        };
        let entries = ctx.into_ledger();
        let columns = frame.columns_from(start_columns);

        let report = StudyReport {
            name: study.name.clone(),
            mode,
            cores: if mode == ExecutionMode::Parallel { cores } else { 0 },
            added,
            columns,
            elapsed,
            entries,
            timed: options.timed,
        };
        info!(
            study = %report.name,
            columns = report.added,
            failures = report.failures().len(),
            elapsed_ms = elapsed.as_secs_f64() * 1000.0,
            "study finished"
        );
        Ok(report)
    }

    /// Former name of [`StudyEngine::study`].
    #[deprecated(note = "use `study` instead")]
    pub fn strategy(
        &self,
        frame: &mut Frame,
        selector: impl Into<Selector>,
        options: &StudyOptions,
    ) -> Result<StudyReport, StudyError> {
        warn!("strategy() is deprecated and will be removed in a future release, use study()");
        self.study(frame, selector, options)
    }
}
