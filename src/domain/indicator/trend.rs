//! Increasing / Decreasing flags.
//!
//! INC(n)[i] = 1.0 if P[i] > P[i-n] else 0.0
//! DEC(n)[i] = 1.0 if P[i] < P[i-n] else 0.0
//! Warmup: first n values are NaN.

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{Indicator, Output};
use crate::domain::params::{Args, ParamSpec};

fn flag_against_lag<F>(values: &[f64], period: usize, test: F) -> Vec<f64>
where
    F: Fn(f64, f64) -> bool,
{
    values
        .iter()
        .enumerate()
        .map(|(i, &curr)| {
            if i < period {
                return f64::NAN;
            }
            let prev = values[i - period];
            if curr.is_nan() || prev.is_nan() {
                f64::NAN
            } else if test(curr, prev) {
                1.0
            } else {
                0.0
            }
        })
        .collect()
}

pub fn increasing(values: &[f64], period: usize) -> Vec<f64> {
    flag_against_lag(values, period, |curr, prev| curr > prev)
}

pub fn decreasing(values: &[f64], period: usize) -> Vec<f64> {
    flag_against_lag(values, period, |curr, prev| curr < prev)
}

const PARAMS: &[ParamSpec] = &[ParamSpec::column("close"), ParamSpec::int("length", 1)];

pub struct Increasing;

impl Indicator for Increasing {
    fn name(&self) -> &'static str {
        "increasing"
    }

    fn category(&self) -> Category {
        Category::Trend
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
        Ok(vec![Output::new(
            format!("INC_{}", length),
            increasing(close, length),
        )])
    }
}

pub struct Decreasing;

impl Indicator for Decreasing {
    fn name(&self) -> &'static str {
        "decreasing"
    }

    fn category(&self) -> Category {
        Category::Trend
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
        Ok(vec![Output::new(
            format!("DEC_{}", length),
            decreasing(close, length),
        )])
    }
}
