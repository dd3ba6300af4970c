//! Run configuration passed explicitly to the dispatcher.

use crate::domain::value::ParamValue;
use std::collections::BTreeMap;

/// Available hardware parallelism minus one, never below zero.
pub fn default_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudyOptions {
    /// Worker count. 0 or 1 runs sequentially.
    pub cores: usize,
    /// Run descriptors strictly in order, one at a time.
    pub ordered: bool,
    pub verbose: bool,
    pub timed: bool,
    /// Reject a column whose label already exists instead of appending a duplicate.
    pub strict_columns: bool,
    /// Run in parallel even when a descriptor reads a column the run has not produced yet.
    pub force_parallel: bool,
    /// Indicator kinds removed from the resolved study.
    pub exclude: Vec<String>,
    /// Parameters applied to every descriptor that declares them and does not set them.
    pub overrides: BTreeMap<String, ParamValue>,
}

impl Default for StudyOptions {
    fn default() -> Self {
        Self {
            cores: default_cores(),
            ordered: false,
            verbose: false,
            timed: false,
            strict_columns: false,
            force_parallel: false,
            exclude: Vec::new(),
            overrides: BTreeMap::new(),
        }
    }
}

impl StudyOptions {
    pub fn sequential() -> Self {
        Self {
            cores: 0,
            ..Self::default()
        }
    }

    pub fn with_cores(mut self, cores: usize) -> Self {
        self.cores = cores;
        self
    }

    pub fn ordered(mut self, ordered: bool) -> Self {
        self.ordered = ordered;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn timed(mut self, timed: bool) -> Self {
        self.timed = timed;
        self
    }

    pub fn strict_columns(mut self, strict: bool) -> Self {
        self.strict_columns = strict;
        self
    }

    pub fn force_parallel(mut self, force: bool) -> Self {
        self.force_parallel = force;
        self
    }

    pub fn exclude<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude = kinds.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_override(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.overrides.insert(name.to_string(), value.into());
        self
    }

    pub fn is_excluded(&self, kind: &str) -> bool {
        self.exclude.iter().any(|e| e.eq_ignore_ascii_case(kind))
    }
}
