//! EBSW (Even Better Sinewave).
//!
//! A one-pole high-pass filter removes cycles longer than `length` bars, a
//! two-pole super smoother over `bars` removes the short ones, and the result
//! is normalised by its three-bar RMS:
//!
//! - alpha = (1 - sin(360 / length)) / cos(360 / length), angles in degrees
//! - HP[i] = 0.5 * (1 + alpha) * (P[i] - P[i-1]) + alpha * HP[i-1]
//! - Filt[i] = c1 * (HP[i] + HP[i-1]) / 2 + c2 * Filt[i-1] + c3 * Filt[i-2]
//! - EBSW[i] = mean3(Filt) / sqrt(mean3(Filt^2)), 0 when the power is 0
//!
//! EBSW[length-1] is seeded with 0. Warmup: first (length-1) values are NaN.

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{Indicator, Output, after_leading_nan};
use crate::domain::params::{Args, ParamSpec};
use std::f64::consts::{PI, SQRT_2};

pub const DEFAULT_LENGTH: i64 = 40;
pub const DEFAULT_BARS: i64 = 10;

/// Shortest high-pass length with a finite filter coefficient.
const MIN_LENGTH: usize = 5;

pub fn ebsw(values: &[f64], length: usize, bars: usize) -> Vec<f64> {
    let len = values.len();
    let mut out = vec![f64::NAN; len];
    if length < MIN_LENGTH || bars == 0 || len < length {
        return out;
    }

    let angle = (360.0 / length as f64).to_radians();
    let alpha = (1.0 - angle.sin()) / angle.cos();
    let a1 = (-SQRT_2 * PI / bars as f64).exp();
    let c2 = 2.0 * a1 * (SQRT_2 * 180.0 / bars as f64).to_radians().cos();
    let c3 = -a1 * a1;
    let c1 = 1.0 - c2 - c3;

    out[length - 1] = 0.0;
    let mut last_hp = 0.0;
    let mut hist = [0.0f64; 2];
    for i in length..len {
        let hp = 0.5 * (1.0 + alpha) * (values[i] - values[i - 1]) + alpha * last_hp;
        let filt = c1 * (hp + last_hp) / 2.0 + c2 * hist[1] + c3 * hist[0];

        let wave = (filt + hist[1] + hist[0]) / 3.0;
        let power = (filt * filt + hist[1] * hist[1] + hist[0] * hist[0]) / 3.0;
        out[i] = if power > 0.0 { wave / power.sqrt() } else { 0.0 };

        hist = [hist[1], filt];
        last_hp = hp;
    }
    out
}

pub struct Ebsw;

const PARAMS: &[ParamSpec] = &[
    ParamSpec::column("close"),
    ParamSpec::int("length", DEFAULT_LENGTH),
    ParamSpec::int("bars", DEFAULT_BARS),
];

impl Indicator for Ebsw {
    fn name(&self) -> &'static str {
        "ebsw"
    }

    fn category(&self) -> Category {
        Category::Cycles
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
        let bars = args.period("bars")?;
        if length < MIN_LENGTH {
            return Err(IndicatorError::invalid_param(
                "length",
                format!("must be at least {}", MIN_LENGTH),
            ));
        }
        let values = after_leading_nan(close, |v| ebsw(v, length, bars));
        Ok(vec![Output::new(format!("EBSW_{}_{}", length, bars), values)])
    }
}
