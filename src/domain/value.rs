//! Parameter values carried by indicator descriptors.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl ParamValue {
    /// Interpret a bare token: integer, float, `true`/`false`, otherwise a string.
    pub fn parse(token: &str) -> ParamValue {
        if let Ok(i) = token.parse::<i64>() {
            return ParamValue::Int(i);
        }
        if let Ok(f) = token.parse::<f64>() {
            return ParamValue::Float(f);
        }
        match token.to_lowercase().as_str() {
            "true" => ParamValue::Bool(true),
            "false" => ParamValue::Bool(false),
            _ => ParamValue::Str(token.to_string()),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "int",
            ParamValue::Float(_) => "float",
            ParamValue::Bool(_) => "bool",
            ParamValue::Str(_) => "string",
        }
    }
}

/// Format a float so that whole numbers keep a trailing `.0` (`2.0`, `0.5`).
pub fn fmt_float(value: f64) -> String {
    format!("{:?}", value)
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(i) => write!(f, "{}", i),
            ParamValue::Float(v) => write!(f, "{}", fmt_float(*v)),
            ParamValue::Bool(b) => write!(f, "{}", b),
            ParamValue::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}
