//! Log and percent returns.
//!
//! LOGRET(n)[i] = ln(P[i] / P[i-n])
//! PCTRET(n)[i] = P[i] / P[i-n] - 1
//!
//! With `cumulative`, log returns are summed and percent returns compounded,
//! producing CUMLOGRET/CUMPCTRET. Warmup: first n values are NaN.

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{Indicator, Output};
use crate::domain::params::{Args, ParamSpec};

pub fn log_return(values: &[f64], period: usize) -> Vec<f64> {
    periodic(values, period, |curr, prev| {
        if prev <= 0.0 || curr <= 0.0 {
            f64::NAN
        } else {
            (curr / prev).ln()
        }
    })
}

pub fn percent_return(values: &[f64], period: usize) -> Vec<f64> {
    periodic(values, period, |curr, prev| {
        if prev == 0.0 {
            f64::NAN
        } else {
            curr / prev - 1.0
        }
    })
}

fn periodic<F>(values: &[f64], period: usize, f: F) -> Vec<f64>
where
    F: Fn(f64, f64) -> f64,
{
    values
        .iter()
        .enumerate()
        .map(|(i, &curr)| {
            if period > 0 && i >= period {
                f(curr, values[i - period])
            } else {
                f64::NAN
            }
        })
        .collect()
}

/// Running sum that skips NaN rows, leaving them NaN.
fn cumulative_sum(values: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    values
        .iter()
        .map(|&v| {
            if v.is_nan() {
                f64::NAN
            } else {
                total += v;
                total
            }
        })
        .collect()
}

/// Compounded growth: prod(1 + r) - 1 over the non-NaN rows.
fn cumulative_product(values: &[f64]) -> Vec<f64> {
    let mut growth = 1.0;
    values
        .iter()
        .map(|&v| {
            if v.is_nan() {
                f64::NAN
            } else {
                growth *= 1.0 + v;
                growth - 1.0
            }
        })
        .collect()
}

const PARAMS: &[ParamSpec] = &[
    ParamSpec::column("close"),
    ParamSpec::int("length", 1),
    ParamSpec::flag("cumulative", false),
];

pub struct LogReturn;

impl Indicator for LogReturn {
    fn name(&self) -> &'static str {
        "log_return"
    }

    fn category(&self) -> Category {
        Category::Performance
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
        let values = log_return(close, length);
        let output = if args.flag("cumulative")? {
            Output::new(format!("CUMLOGRET_{}", length), cumulative_sum(&values))
        } else {
            Output::new(format!("LOGRET_{}", length), values)
        };
        Ok(vec![output])
    }
}

pub struct PercentReturn;

impl Indicator for PercentReturn {
    fn name(&self) -> &'static str {
        "percent_return"
    }

    fn category(&self) -> Category {
        Category::Performance
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
        let values = percent_return(close, length);
        let output = if args.flag("cumulative")? {
            Output::new(format!("CUMPCTRET_{}", length), cumulative_product(&values))
        } else {
            Output::new(format!("PCTRET_{}", length), values)
        };
        Ok(vec![output])
    }
}
