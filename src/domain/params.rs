//! Indicator parameter schemas and argument binding.
//!
//! Each indicator declares an ordered list of [`ParamSpec`]s. Binding fills the
//! tunable (non-column) parameters from positional values first, overlays named
//! values, and falls back to declared defaults for the rest.

use crate::domain::error::{IndicatorError, StudyError};
use crate::domain::frame::Frame;
use crate::domain::value::ParamValue;
use std::collections::BTreeMap;

/// Keyword names handled by the column naming resolver rather than the indicator.
pub const NAMING_KEYS: [&str; 2] = ["prefix", "suffix"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Int,
    Float,
    Bool,
    /// Name of an input column in the frame.
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamDefault {
    Int(i64),
    Float(f64),
    Bool(bool),
    Column(&'static str),
}

impl ParamDefault {
    fn kind(&self) -> ParamKind {
        match self {
            ParamDefault::Int(_) => ParamKind::Int,
            ParamDefault::Float(_) => ParamKind::Float,
            ParamDefault::Bool(_) => ParamKind::Bool,
            ParamDefault::Column(_) => ParamKind::Column,
        }
    }

    fn to_value(self) -> ParamValue {
        match self {
            ParamDefault::Int(v) => ParamValue::Int(v),
            ParamDefault::Float(v) => ParamValue::Float(v),
            ParamDefault::Bool(v) => ParamValue::Bool(v),
            ParamDefault::Column(v) => ParamValue::Str(v.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: ParamDefault,
}

impl ParamSpec {
    pub const fn int(name: &'static str, default: i64) -> Self {
        Self {
            name,
            kind: ParamKind::Int,
            default: ParamDefault::Int(default),
        }
    }

    pub const fn float(name: &'static str, default: f64) -> Self {
        Self {
            name,
            kind: ParamKind::Float,
            default: ParamDefault::Float(default),
        }
    }

    pub const fn flag(name: &'static str, default: bool) -> Self {
        Self {
            name,
            kind: ParamKind::Bool,
            default: ParamDefault::Bool(default),
        }
    }

    /// An input series parameter whose default is the column of the same name.
    pub const fn column(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Column,
            default: ParamDefault::Column(name),
        }
    }

    pub fn is_tunable(&self) -> bool {
        self.kind != ParamKind::Column
    }

    /// Whether the declared default agrees with the declared kind.
    pub fn is_consistent(&self) -> bool {
        self.default.kind() == self.kind
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindError {
    #[error("takes at most {expected} positional parameters, got {got}")]
    Arity { expected: usize, got: usize },

    #[error("unknown parameter '{0}'")]
    Unknown(String),

    #[error("parameter {name} expects {expected:?}, got {got}")]
    WrongType {
        name: String,
        expected: ParamKind,
        got: &'static str,
    },
}

impl BindError {
    pub fn into_study_error(self, kind: &str) -> StudyError {
        match self {
            BindError::Arity { expected, got } => StudyError::ParamArity {
                kind: kind.to_string(),
                expected,
                got,
            },
            BindError::Unknown(name) => StudyError::InvalidParam {
                kind: kind.to_string(),
                name,
                reason: "not declared by this indicator".to_string(),
            },
            BindError::WrongType {
                name,
                expected,
                got,
            } => StudyError::InvalidParam {
                kind: kind.to_string(),
                name,
                reason: format!("expected {:?}, got {}", expected, got),
            },
        }
    }
}

impl From<BindError> for IndicatorError {
    fn from(err: BindError) -> Self {
        match &err {
            BindError::Unknown(name) | BindError::WrongType { name, .. } => {
                IndicatorError::invalid_param(name, err.to_string())
            }
            BindError::Arity { .. } => IndicatorError::invalid_param("params", err.to_string()),
        }
    }
}

/// Fully bound arguments for one indicator call, in declared order.
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    values: Vec<(&'static str, ParamValue)>,
}

impl Args {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    pub fn int(&self, name: &str) -> Result<i64, IndicatorError> {
        match self.get(name) {
            Some(ParamValue::Int(v)) => Ok(*v),
            _ => Err(IndicatorError::invalid_param(name, "expected an integer")),
        }
    }

    /// A strictly positive window length.
    pub fn period(&self, name: &str) -> Result<usize, IndicatorError> {
        let value = self.int(name)?;
        if value <= 0 {
            return Err(IndicatorError::invalid_param(name, "must be positive"));
        }
        Ok(value as usize)
    }

    pub fn float(&self, name: &str) -> Result<f64, IndicatorError> {
        match self.get(name) {
            Some(ParamValue::Float(v)) => Ok(*v),
            Some(ParamValue::Int(v)) => Ok(*v as f64),
            _ => Err(IndicatorError::invalid_param(name, "expected a number")),
        }
    }

    pub fn flag(&self, name: &str) -> Result<bool, IndicatorError> {
        match self.get(name) {
            Some(ParamValue::Bool(v)) => Ok(*v),
            _ => Err(IndicatorError::invalid_param(name, "expected a boolean")),
        }
    }

    pub fn column(&self, name: &str) -> Result<&str, IndicatorError> {
        match self.get(name) {
            Some(ParamValue::Str(v)) => Ok(v),
            _ => Err(IndicatorError::invalid_param(name, "expected a column name")),
        }
    }

    /// Resolve a column parameter against the frame.
    pub fn series<'f>(&self, frame: &'f Frame, name: &str) -> Result<&'f [f64], IndicatorError> {
        frame.require(self.column(name)?)
    }

    /// Names of the input columns this call reads.
    pub fn input_columns(&self, specs: &[ParamSpec]) -> Vec<&str> {
        specs
            .iter()
            .filter(|s| s.kind == ParamKind::Column)
            .filter_map(|s| match self.get(s.name) {
                Some(ParamValue::Str(v)) => Some(v.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn coerce(spec: &ParamSpec, value: &ParamValue) -> Result<ParamValue, BindError> {
    let coerced = match (spec.kind, value) {
        (ParamKind::Int, ParamValue::Int(_))
        | (ParamKind::Float, ParamValue::Float(_))
        | (ParamKind::Bool, ParamValue::Bool(_))
        | (ParamKind::Column, ParamValue::Str(_)) => Some(value.clone()),
        (ParamKind::Float, ParamValue::Int(v)) => Some(ParamValue::Float(*v as f64)),
        _ => None,
    };
    coerced.ok_or_else(|| BindError::WrongType {
        name: spec.name.to_string(),
        expected: spec.kind,
        got: value.type_name(),
    })
}

/// Bind positional and named values against a parameter schema.
pub fn bind(
    specs: &[ParamSpec],
    params: &[ParamValue],
    kwargs: &BTreeMap<String, ParamValue>,
) -> Result<Args, BindError> {
    let tunable: Vec<&ParamSpec> = specs.iter().filter(|s| s.is_tunable()).collect();
    if params.len() > tunable.len() {
        return Err(BindError::Arity {
            expected: tunable.len(),
            got: params.len(),
        });
    }

    let mut values: Vec<(&'static str, ParamValue)> = specs
        .iter()
        .map(|s| (s.name, s.default.to_value()))
        .collect();

    for (spec, value) in tunable.iter().zip(params) {
        let coerced = coerce(spec, value)?;
        if let Some(slot) = values.iter_mut().find(|(n, _)| *n == spec.name) {
            slot.1 = coerced;
        }
    }

    for (key, value) in kwargs {
        if NAMING_KEYS.contains(&key.as_str()) {
            continue;
        }
        let spec = specs
            .iter()
            .find(|s| s.name == key.as_str())
            .ok_or_else(|| BindError::Unknown(key.clone()))?;
        let coerced = coerce(spec, value)?;
        if let Some(slot) = values.iter_mut().find(|(n, _)| *n == spec.name) {
            slot.1 = coerced;
        }
    }

    Ok(Args { values })
}

/// Whether `name` is already set by the positional or named values.
pub fn is_set(
    specs: &[ParamSpec],
    params: &[ParamValue],
    kwargs: &BTreeMap<String, ParamValue>,
    name: &str,
) -> bool {
    if kwargs.contains_key(name) {
        return true;
    }
    specs
        .iter()
        .filter(|s| s.is_tunable())
        .position(|s| s.name == name)
        .is_some_and(|pos| pos < params.len())
}
