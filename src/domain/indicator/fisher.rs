//! Fisher Transform.
//!
//! Over the median price hl2 = (H + L) / 2:
//! - position = (hl2 - lowest(n)) / (highest(n) - lowest(n)) - 0.5, 0 range counts as 0
//! - v = clamp(0.66 * position + 0.67 * v_prev, ±0.999)
//! - FISHERT[i] = 0.5 * ln((1 + v) / (1 - v)) + 0.5 * FISHERT[i-1]
//! - FISHERTs is FISHERT lagged by `signal` rows.
//!
//! FISHERT[n-1] is seeded with 0. Warmup: first (n-1) values are NaN.

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{Indicator, Output};
use crate::domain::params::{Args, ParamSpec};

const CLAMP: f64 = 0.999;

pub fn fisher(high: &[f64], low: &[f64], period: usize) -> Vec<f64> {
    let len = high.len().min(low.len());
    let mut out = vec![f64::NAN; len];
    if period == 0 || len < period {
        return out;
    }

    let hl2: Vec<f64> = high.iter().zip(low).map(|(h, l)| (h + l) / 2.0).collect();
    out[period - 1] = 0.0;
    let mut v = 0.0;
    for i in period..len {
        let window = &hl2[i + 1 - period..=i];
        let highest = window.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lowest = window.iter().copied().fold(f64::INFINITY, f64::min);
        let range = highest - lowest;
        let ratio = if range == 0.0 {
            0.0
        } else {
            (hl2[i] - lowest) / range
        };
        let position = ratio - 0.5;

        v = (0.66 * position + 0.67 * v).clamp(-CLAMP, CLAMP);
        out[i] = 0.5 * (((1.0 + v) / (1.0 - v)).ln() + out[i - 1]);
    }
    out
}

/// Shift a series forward by `lag` rows.
pub fn lagged(values: &[f64], lag: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; values.len().min(lag)];
    out.extend(values.iter().take(values.len().saturating_sub(lag)));
    out
}

pub struct Fisher;

const PARAMS: &[ParamSpec] = &[
    ParamSpec::column("high"),
    ParamSpec::column("low"),
    ParamSpec::int("length", 9),
    ParamSpec::int("signal", 1),
];

impl Indicator for Fisher {
    fn name(&self) -> &'static str {
        "fisher"
    }

    fn category(&self) -> Category {
        Category::Momentum
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn arity(&self) -> usize {
        2
    }

    fn compute(&self, frame: &Frame, args: &Args) -> Result<Vec<Output>, IndicatorError> {
        let high = args.series(frame, "high")?;
        let low = args.series(frame, "low")?;
        let length = args.period("length")?;
        let signal = args.period("signal")?;

        let line = fisher(high, low, length);
        let trigger = lagged(&line, signal);
        let suffix = format!("{}_{}", length, signal);
        Ok(vec![
            Output::new(format!("FISHERT_{}", suffix), line),
            Output::new(format!("FISHERTs_{}", suffix), trigger),
        ])
    }
}
