//! Simple Moving Average.
//!
//! SMA(n)[i] = mean(P[i-n+1..=i]), running-sum implementation.
//! Warmup: first (n-1) values are NaN.

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{Indicator, Output, after_leading_nan};
use crate::domain::params::{Args, ParamSpec};

pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    after_leading_nan(values, |values| {
        let mut out = vec![f64::NAN; values.len()];
        if period == 0 {
            return out;
        }
        let mut sum = 0.0;
        for i in 0..values.len() {
            sum += values[i];
            if i >= period {
                sum -= values[i - period];
            }
            if i + 1 >= period {
                out[i] = sum / period as f64;
            }
        }
        out
    })
}

pub struct Sma;

const PARAMS: &[ParamSpec] = &[ParamSpec::column("close"), ParamSpec::int("length", 10)];

impl Indicator for Sma {
    fn name(&self) -> &'static str {
        "sma"
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
        Ok(vec![Output::new(format!("SMA_{}", length), sma(close, length))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::*;
    use crate::domain::params::bind;
    use approx::assert_relative_eq;
    use std::collections::BTreeMap;

    #[test]
    fn sma_warmup_and_values() {
        let out = sma(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_nan_prefix(&out, 2);
        assert_relative_eq!(out[2], 2.0);
        assert_relative_eq!(out[3], 3.0);
        assert_relative_eq!(out[4], 4.0);
    }

    #[test]
    fn sma_skips_leading_nan() {
        let out = sma(&[f64::NAN, 2.0, 4.0, 6.0], 2);
        assert_nan_prefix(&out, 2);
        assert_relative_eq!(out[2], 3.0);
        assert_relative_eq!(out[3], 5.0);
    }

    #[test]
    fn sma_period_longer_than_data() {
        let out = sma(&[1.0, 2.0], 5);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn compute_names_column_by_length() {
        let frame = frame_from_closes(&[1.0, 2.0, 3.0, 4.0]);
        let mut kwargs = BTreeMap::new();
        kwargs.insert("length".to_string(), 2i64.into());
        let args = bind(PARAMS, &[], &kwargs).unwrap();
        let out = Sma.compute(&frame, &args).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "SMA_2");
        assert_relative_eq!(out[0].values[3], 3.5);
    }

    #[test]
    fn compute_rejects_zero_length() {
        let frame = frame_from_closes(&[1.0, 2.0]);
        let mut kwargs = BTreeMap::new();
        kwargs.insert("length".to_string(), 0i64.into());
        let args = bind(PARAMS, &[], &kwargs).unwrap();
        assert!(matches!(
            Sma.compute(&frame, &args),
            Err(IndicatorError::InvalidParam { .. })
        ));
    }
}
