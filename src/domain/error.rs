//! Domain error types.
//!
//! [`StudyError`] is fatal to a run and is returned before any indicator
//! executes. [`IndicatorError`] belongs to a single descriptor; executors record
//! it in the ledger and move on.

/// A parse error with position information for descriptor text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    /// Format the error with a caret pointing at the error position in the input.
    pub fn display_with_context(&self, input: &str) -> String {
        let caret = " ".repeat(self.position) + "^";
        format!(
            "{input}\n{caret}\n{err}",
            input = input,
            caret = caret,
            err = self
        )
    }
}

/// Run-level error: configuration problems detected while resolving a study.
#[derive(Debug, thiserror::Error)]
pub enum StudyError {
    #[error("unknown category '{name}' (valid: {valid})")]
    UnknownCategory { name: String, valid: String },

    #[error("study name must not be empty")]
    EmptyStudyName,

    #[error("study '{name}' has no indicators")]
    EmptyStudy { name: String },

    #[error("invalid col_names for {kind}: {reason}")]
    InvalidColumnNames { kind: String, reason: String },

    #[error("invalid col_numbers for {kind}: {reason}")]
    InvalidColumnNumbers { kind: String, reason: String },

    #[error("{kind} takes at most {expected} positional parameters, got {got}")]
    ParamArity {
        kind: String,
        expected: usize,
        got: usize,
    },

    #[error("invalid parameter {name} for {kind}: {reason}")]
    InvalidParam {
        kind: String,
        name: String,
        reason: String,
    },

    #[error("indicator registration failed: {reason}")]
    Registration { reason: String },

    #[error("worker pool: {reason}")]
    WorkerPool { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    DescriptorParse(#[from] ParseError),

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure of a single descriptor. Never aborts a run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorError {
    #[error("unknown indicator kind '{0}'")]
    UnknownKind(String),

    #[error("column '{0}' not found")]
    MissingColumn(String),

    #[error("invalid parameter {name}: {reason}")]
    InvalidParam { name: String, reason: String },

    #[error("{0}")]
    Computation(String),

    #[error("column naming: {0}")]
    Naming(String),

    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("column '{name}' has {got} rows, frame has {expected}")]
    LengthMismatch {
        name: String,
        got: usize,
        expected: usize,
    },
}

impl IndicatorError {
    pub fn invalid_param(name: &str, reason: impl Into<String>) -> Self {
        IndicatorError::InvalidParam {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
