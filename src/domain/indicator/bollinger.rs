//! Bollinger Bands.
//!
//! - Middle: Simple Moving Average over n periods
//! - Upper: Middle + (std × StdDev)
//! - Lower: Middle - (std × StdDev)
//! - Bandwidth: 100 × (Upper - Lower) / Middle
//! - Percent: (P - Lower) / (Upper - Lower)
//!
//! StdDev is the population standard deviation (divides by N).
//! Columns, in natural order: BBL, BBM, BBU, BBB, BBP.
//! Default parameters: length=5, std=2.0

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::sma::sma;
use crate::domain::indicator::stddev::stdev;
use crate::domain::indicator::{Indicator, Output};
use crate::domain::params::{Args, ParamSpec};
use crate::domain::value::fmt_float;

pub struct Bands {
    pub lower: Vec<f64>,
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub bandwidth: Vec<f64>,
    pub percent: Vec<f64>,
}

pub fn bollinger(values: &[f64], period: usize, mult: f64) -> Bands {
    let middle = sma(values, period);
    let deviation = stdev(values, period);

    let mut lower = Vec::with_capacity(values.len());
    let mut upper = Vec::with_capacity(values.len());
    let mut bandwidth = Vec::with_capacity(values.len());
    let mut percent = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let lo = middle[i] - mult * deviation[i];
        let hi = middle[i] + mult * deviation[i];
        let width = hi - lo;
        lower.push(lo);
        upper.push(hi);
        bandwidth.push(if middle[i] == 0.0 {
            f64::NAN
        } else {
            100.0 * width / middle[i]
        });
        percent.push(if width == 0.0 {
            f64::NAN
        } else {
            (values[i] - lo) / width
        });
    }

    Bands {
        lower,
        middle,
        upper,
        bandwidth,
        percent,
    }
}

pub struct BBands;

const PARAMS: &[ParamSpec] = &[
    ParamSpec::column("close"),
    ParamSpec::int("length", 5),
    ParamSpec::float("std", 2.0),
];

impl Indicator for BBands {
    fn name(&self) -> &'static str {
        "bbands"
    }

    fn category(&self) -> Category {
        Category::Volatility
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn arity(&self) -> usize {
        5
    }

    fn compute(&self, frame: &Frame, args: &Args) -> Result<Vec<Output>, IndicatorError> {
        let close = args.series(frame, "close")?;
        let length = args.period("length")?;
        let std = args.float("std")?;
        if std <= 0.0 {
            return Err(IndicatorError::invalid_param("std", "must be positive"));
        }
        let suffix = format!("{}_{}", length, fmt_float(std));
        let bands = bollinger(close, length, std);
        Ok(vec![
            Output::new(format!("BBL_{}", suffix), bands.lower),
            Output::new(format!("BBM_{}", suffix), bands.middle),
            Output::new(format!("BBU_{}", suffix), bands.upper),
            Output::new(format!("BBB_{}", suffix), bands.bandwidth),
            Output::new(format!("BBP_{}", suffix), bands.percent),
        ])
    }
}
