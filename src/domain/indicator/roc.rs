//! ROC (Rate of Change) and MOM (Momentum).
//!
//! ROC(n)[i] = ((P[i] - P[i-n]) / P[i-n]) * 100, 0 when P[i-n] == 0
//! MOM(n)[i] = P[i] - P[i-n]
//! Warmup: first n values are NaN.

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{Indicator, Output};
use crate::domain::params::{Args, ParamSpec};

fn lagged<F>(values: &[f64], period: usize, f: F) -> Vec<f64>
where
    F: Fn(f64, f64) -> f64,
{
    values
        .iter()
        .enumerate()
        .map(|(i, &curr)| {
            if i >= period {
                f(curr, values[i - period])
            } else {
                f64::NAN
            }
        })
        .collect()
}

pub fn roc(values: &[f64], period: usize) -> Vec<f64> {
    lagged(values, period, |curr, prev| {
        if prev == 0.0 {
            0.0
        } else {
            ((curr - prev) / prev) * 100.0
        }
    })
}

pub fn mom(values: &[f64], period: usize) -> Vec<f64> {
    lagged(values, period, |curr, prev| curr - prev)
}

const PARAMS: &[ParamSpec] = &[ParamSpec::column("close"), ParamSpec::int("length", 10)];

pub struct Roc;

impl Indicator for Roc {
    fn name(&self) -> &'static str {
        "roc"
    }

    fn category(&self) -> Category {
        Category::Momentum
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn arity(&self) -> usize {
        1
    }

    fn compute(&self, frame: &Frame, args: &Args) -> Result<Vec<Output>, IndicatorError> {
        let close = args.series(frame, "close")?;
        let length = args.period("length")?;
        Ok(vec![Output::new(format!("ROC_{}", length), roc(close, length))])
    }
}

pub struct Mom;

impl Indicator for Mom {
    fn name(&self) -> &'static str {
        "mom"
    }

    fn category(&self) -> Category {
        Category::Momentum
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn arity(&self) -> usize {
        1
    }

    fn compute(&self, frame: &Frame, args: &Args) -> Result<Vec<Output>, IndicatorError> {
        let close = args.series(frame, "close")?;
        let length = args.period("length")?;
        Ok(vec![Output::new(format!("MOM_{}", length), mom(close, length))])
    }
}
