//! RSI (Relative Strength Index).
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = scalar - (scalar / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = scalar
//!
//! Warmup: first n values are NaN (n price changes are needed for the seed).

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{Indicator, Output, after_leading_nan};
use crate::domain::params::{Args, ParamSpec};

pub fn rsi(values: &[f64], period: usize, scalar: f64) -> Vec<f64> {
    after_leading_nan(values, |values| {
        let mut out = vec![f64::NAN; values.len()];
        if period == 0 || values.len() <= period {
            return out;
        }

        let changes: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        let gain = |c: f64| if c > 0.0 { c } else { 0.0 };
        let loss = |c: f64| if c < 0.0 { -c } else { 0.0 };

        let mut avg_gain = changes[..period].iter().map(|&c| gain(c)).sum::<f64>() / period as f64;
        let mut avg_loss = changes[..period].iter().map(|&c| loss(c)).sum::<f64>() / period as f64;

        let index = |avg_gain: f64, avg_loss: f64| {
            if avg_loss == 0.0 {
                scalar
            } else {
                scalar - (scalar / (1.0 + avg_gain / avg_loss))
            }
        };

        out[period] = index(avg_gain, avg_loss);
        for (i, &change) in changes.iter().enumerate().skip(period) {
            avg_gain = (avg_gain * (period - 1) as f64 + gain(change)) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + loss(change)) / period as f64;
            out[i + 1] = index(avg_gain, avg_loss);
        }
        out
    })
}

pub struct Rsi;

const PARAMS: &[ParamSpec] = &[
    ParamSpec::column("close"),
    ParamSpec::int("length", 14),
    ParamSpec::float("scalar", 100.0),
];

impl Indicator for Rsi {
    fn name(&self) -> &'static str {
        "rsi"
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
        let scalar = args.float("scalar")?;
        Ok(vec![Output::new(
            format!("RSI_{}", length),
            rsi(close, length, scalar),
        )])
    }
}
