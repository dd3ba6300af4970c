//! Exponential Moving Average.
//!
//! k = 2/(n+1), seed with first SMA, then EMA[i] = P[i]*k + EMA[i-1]*(1-k).
//! Warmup: first (n-1) values are NaN.

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{Indicator, Output, after_leading_nan};
use crate::domain::params::{Args, ParamSpec};

pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    after_leading_nan(values, |values| {
        let mut out = vec![f64::NAN; values.len()];
        if period == 0 || values.len() < period {
            return out;
        }

        let k = 2.0 / (period as f64 + 1.0);
        let mut ema = values[..period].iter().sum::<f64>() / period as f64;
        out[period - 1] = ema;
        for i in period..values.len() {
            ema = values[i] * k + ema * (1.0 - k);
            out[i] = ema;
        }
        out
    })
}

pub struct Ema;

const PARAMS: &[ParamSpec] = &[ParamSpec::column("close"), ParamSpec::int("length", 10)];

impl Indicator for Ema {
    fn name(&self) -> &'static str {
        "ema"
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
        Ok(vec![Output::new(format!("EMA_{}", length), ema(close, length))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::test_support::*;
    use approx::assert_relative_eq;

    #[test]
    fn ema_warmup() {
        let out = ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        assert_nan_prefix(&out, 2);
    }

    #[test]
    fn ema_period_1() {
        let out = ema(&[10.0, 20.0, 30.0], 1);
        assert_relative_eq!(out[0], 10.0);
        assert_relative_eq!(out[1], 20.0);
        assert_relative_eq!(out[2], 30.0);
    }

    #[test]
    fn ema_recursive_calculation() {
        let out = ema(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);

        let k = 2.0 / 4.0;
        let sma = (10.0 + 20.0 + 30.0) / 3.0;
        assert_relative_eq!(out[2], sma);

        let ema_3 = 40.0 * k + sma * (1.0 - k);
        assert_relative_eq!(out[3], ema_3);

        let ema_4 = 50.0 * k + ema_3 * (1.0 - k);
        assert_relative_eq!(out[4], ema_4);
    }

    #[test]
    fn ema_equal_prices() {
        let out = ema(&[100.0; 5], 3);
        for v in &out[2..] {
            assert_relative_eq!(*v, 100.0);
        }
    }

    #[test]
    fn ema_empty_and_zero_period() {
        assert!(ema(&[], 3).is_empty());
        assert!(ema(&[10.0, 20.0], 0).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn ema_over_chained_series_with_gap() {
        let out = ema(&[f64::NAN, 1.0, 2.0, 3.0], 2);
        assert_nan_prefix(&out, 2);
        assert_relative_eq!(out[2], 1.5);
    }

    #[test]
    fn compute_reads_named_input_column() {
        let mut frame = frame_from_closes(&[1.0, 2.0, 3.0]);
        frame.append("CUMLOGRET_1", vec![f64::NAN, 0.5, 0.7], false).unwrap();
        let mut kwargs = std::collections::BTreeMap::new();
        kwargs.insert("close".to_string(), "CUMLOGRET_1".into());
        kwargs.insert("length".to_string(), 1i64.into());
        let args = crate::domain::params::bind(PARAMS, &[], &kwargs).unwrap();
        let out = Ema.compute(&frame, &args).unwrap();
        assert_eq!(out[0].name, "EMA_1");
        assert_relative_eq!(out[0].values[2], 0.7);
    }
}
