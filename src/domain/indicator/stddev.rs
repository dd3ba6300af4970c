//! Standard Deviation.
//!
//! Population standard deviation over n values.
//! STDEV(n)[i] = sqrt(sum((P[i-j] - SMA(n)[i])^2 for j in 0..n) / n)
//! Warmup: first (n-1) values are NaN.

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{Indicator, Output, after_leading_nan};
use crate::domain::params::{Args, ParamSpec};

pub fn stdev(values: &[f64], period: usize) -> Vec<f64> {
    after_leading_nan(values, |values| {
        let mut out = vec![f64::NAN; values.len()];
        if period == 0 {
            return out;
        }
        for i in (period - 1)..values.len() {
            let window = &values[i + 1 - period..=i];
            let mean = window.iter().sum::<f64>() / period as f64;
            let variance = window
                .iter()
                .map(|v| {
                    let diff = v - mean;
                    diff * diff
                })
                .sum::<f64>()
                / period as f64;
            out[i] = variance.sqrt();
        }
        out
    })
}

pub struct Stdev;

const PARAMS: &[ParamSpec] = &[ParamSpec::column("close"), ParamSpec::int("length", 30)];

impl Indicator for Stdev {
    fn name(&self) -> &'static str {
        "stdev"
    }

    fn category(&self) -> Category {
        Category::Statistics
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
            format!("STDEV_{}", length),
            stdev(close, length),
        )])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::assert_nan_prefix;
    use approx::assert_relative_eq;

    #[test]
    fn stddev_warmup() {
        let out = stdev(&[1.0, 2.0, 3.0, 4.0], 3);
        assert_nan_prefix(&out, 2);
    }

    #[test]
    fn stddev_constant_is_zero() {
        let out = stdev(&[5.0; 4], 2);
        assert_relative_eq!(out[3], 0.0);
    }

    #[test]
    fn stddev_population_formula() {
        // mean 5, squared diffs 9+1+1+9 = 20, /4 = 5
        let out = stdev(&[2.0, 4.0, 6.0, 8.0], 4);
        assert_relative_eq!(out[3], 5.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn stddev_period_longer_than_data() {
        assert!(stdev(&[1.0, 2.0], 3).iter().all(|v| v.is_nan()));
    }
}
