//! Technical indicator implementations.
//!
//! Every indicator implements [`Indicator`]: a lower-case registry key, its
//! category, an ordered parameter schema, the number of columns it naturally
//! produces, and a `compute` over a read-only [`Frame`]. Indicators read their
//! inputs through column parameters, so any column in the frame (including one
//! appended earlier in the same run) can be fed in.
//!
//! Warm-up rows are `NaN`.

pub mod atr;
pub mod bollinger;
pub mod ebsw;
pub mod ema;
pub mod fisher;
pub mod heikin_ashi;
pub mod macd;
pub mod obv;
pub mod registry;
pub mod returns;
pub mod roc;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod trend;
pub mod wma;

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::params::{Args, ParamSpec};

pub use registry::IndicatorRegistry;

/// One output column of an indicator, with its natural name.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub name: String,
    pub values: Vec<f64>,
}

impl Output {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

pub trait Indicator: Send + Sync {
    fn name(&self) -> &'static str;
    fn category(&self) -> Category;
    fn params(&self) -> &'static [ParamSpec];
    /// Number of columns `compute` returns.
    fn arity(&self) -> usize;
    fn compute(&self, frame: &Frame, args: &Args) -> Result<Vec<Output>, IndicatorError>;
}

/// Apply `f` to the part of `values` after any leading `NaN`s and pad the
/// result back to full length. Chained inputs usually start with a warm-up gap.
pub(crate) fn after_leading_nan<F>(values: &[f64], f: F) -> Vec<f64>
where
    F: FnOnce(&[f64]) -> Vec<f64>,
{
    let start = values
        .iter()
        .position(|v| !v.is_nan())
        .unwrap_or(values.len());
    let mut out = vec![f64::NAN; start];
    out.extend(f(&values[start..]));
    out
}
