//! Indicator descriptors: one indicator invocation inside a study.

use crate::domain::error::StudyError;
use crate::domain::value::ParamValue;
use std::collections::BTreeMap;
use std::fmt;

/// Explicit output column names.
#[derive(Debug, Clone, PartialEq)]
pub enum ColNames {
    Single(String),
    Many(Vec<String>),
}

impl ColNames {
    pub fn len(&self) -> usize {
        match self {
            ColNames::Single(_) => 1,
            ColNames::Many(names) => names.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> Vec<&str> {
        match self {
            ColNames::Single(name) => vec![name.as_str()],
            ColNames::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for ColNames {
    fn from(name: &str) -> Self {
        ColNames::Single(name.to_string())
    }
}

impl<const N: usize> From<[&str; N]> for ColNames {
    fn from(names: [&str; N]) -> Self {
        ColNames::Many(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<Vec<String>> for ColNames {
    fn from(names: Vec<String>) -> Self {
        ColNames::Many(names)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorDescriptor {
    pub kind: String,
    pub params: Vec<ParamValue>,
    pub kwargs: BTreeMap<String, ParamValue>,
    pub col_names: Option<ColNames>,
    pub col_numbers: Option<Vec<usize>>,
}

impl IndicatorDescriptor {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Vec::new(),
            kwargs: BTreeMap::new(),
            col_names: None,
            col_numbers: None,
        }
    }

    /// Set a named parameter.
    pub fn arg(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        self.kwargs.insert(name.to_string(), value.into());
        self
    }

    /// Set the positional parameters.
    pub fn params<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        self.params = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn col_names(mut self, names: impl Into<ColNames>) -> Self {
        self.col_names = Some(names.into());
        self
    }

    pub fn col_numbers<I: IntoIterator<Item = usize>>(mut self, numbers: I) -> Self {
        self.col_numbers = Some(numbers.into_iter().collect());
        self
    }

    /// Registry key: the kind, lower-cased.
    pub fn key(&self) -> String {
        self.kind.to_lowercase()
    }

    pub fn kwarg_str(&self, name: &str) -> Option<&str> {
        match self.kwargs.get(name) {
            Some(ParamValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Structural checks that need no indicator implementation.
    pub fn validate_shape(&self) -> Result<(), StudyError> {
        if self.kind.trim().is_empty() {
            return Err(StudyError::InvalidParam {
                kind: String::new(),
                name: "kind".into(),
                reason: "must not be empty".into(),
            });
        }
        if let Some(names) = &self.col_names {
            if names.is_empty() {
                return Err(StudyError::InvalidColumnNames {
                    kind: self.kind.clone(),
                    reason: "empty name list".into(),
                });
            }
            if names.names().iter().any(|n| n.trim().is_empty()) {
                return Err(StudyError::InvalidColumnNames {
                    kind: self.kind.clone(),
                    reason: "names must not be blank".into(),
                });
            }
        }
        if let Some(numbers) = &self.col_numbers {
            if numbers.is_empty() {
                return Err(StudyError::InvalidColumnNumbers {
                    kind: self.kind.clone(),
                    reason: "empty selection".into(),
                });
            }
            for (i, n) in numbers.iter().enumerate() {
                if numbers[..i].contains(n) {
                    return Err(StudyError::InvalidColumnNumbers {
                        kind: self.kind.clone(),
                        reason: format!("column {} selected twice", n),
                    });
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for IndicatorDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        let mut parts: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        parts.extend(self.kwargs.iter().map(|(k, v)| format!("{}={}", k, v)));
        if !parts.is_empty() {
            write!(f, "({})", parts.join(", "))?;
        }
        Ok(())
    }
}
