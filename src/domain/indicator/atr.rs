//! ATR (Average True Range), Wilder smoothed.

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{Indicator, Output};
use crate::domain::params::{Args, ParamSpec};

/// max(high - low, |high - prev_close|, |low - prev_close|)
pub fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}

pub fn atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<f64> {
    let len = high.len().min(low.len()).min(close.len());
    let mut out = vec![f64::NAN; len];
    if period == 0 || len < period {
        return out;
    }

    let tr: Vec<f64> = (0..len)
        .map(|i| {
            if i == 0 {
                high[0] - low[0]
            } else {
                true_range(high[i], low[i], close[i - 1])
            }
        })
        .collect();

    let mut value = tr[..period].iter().sum::<f64>() / period as f64;
    out[period - 1] = value;
    for i in period..len {
        value = (value * (period - 1) as f64 + tr[i]) / period as f64;
        out[i] = value;
    }
    out
}

pub struct Atr;

const PARAMS: &[ParamSpec] = &[
    ParamSpec::column("high"),
    ParamSpec::column("low"),
    ParamSpec::column("close"),
    ParamSpec::int("length", 14),
];

impl Indicator for Atr {
    fn name(&self) -> &'static str {
        "atr"
    }

    fn category(&self) -> Category {
        Category::Volatility
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn arity(&self) -> usize {
        1
    }

    fn compute(&self, frame: &Frame, args: &Args) -> Result<Vec<Output>, IndicatorError> {
        let high = args.series(frame, "high")?;
        let low = args.series(frame, "low")?;
        let close = args.series(frame, "close")?;
        let length = args.period("length")?;
        Ok(vec![Output::new(
            format!("ATRr_{}", length),
            atr(high, low, close, length),
        )])
    }
}
