//! Weighted Moving Average.
//!
//! O(n) sliding window implementation using Diophantine technique.
//! WMA(n) = (1*P[i-n+1] + 2*P[i-n+2] + ... + n*P[i]) / (n*(n+1)/2)
//! Warmup: first (n-1) values are NaN.

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{Indicator, Output, after_leading_nan};
use crate::domain::params::{Args, ParamSpec};

pub fn wma(values: &[f64], period: usize) -> Vec<f64> {
    after_leading_nan(values, |values| {
        let mut out = vec![f64::NAN; values.len()];
        if period == 0 {
            return out;
        }

        let divisor = (period * (period + 1)) as f64 / 2.0;
        let mut weighted_sum = 0.0;
        let mut window_sum = 0.0;

        for (i, &value) in values.iter().enumerate() {
            if i < period {
                weighted_sum += (i + 1) as f64 * value;
                window_sum += value;
            } else {
                weighted_sum += period as f64 * value - window_sum;
                window_sum += value - values[i - period];
            }
            if i + 1 >= period {
                out[i] = weighted_sum / divisor;
            }
        }
        out
    })
}

pub struct Wma;

const PARAMS: &[ParamSpec] = &[ParamSpec::column("close"), ParamSpec::int("length", 10)];

impl Indicator for Wma {
    fn name(&self) -> &'static str {
        "wma"
    }

    fn category(&self) -> Category {
        Category::Overlap
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
        Ok(vec![Output::new(format!("WMA_{}", length), wma(close, length))])
    }
}
