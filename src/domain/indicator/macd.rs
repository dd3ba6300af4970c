//! MACD (Moving Average Convergence Divergence).
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Columns, in natural order: MACD, MACDh (histogram), MACDs (signal).
//! Default parameters: fast=12, slow=26, signal=9

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::ema::ema;
use crate::domain::indicator::{Indicator, Output};
use crate::domain::params::{Args, ParamSpec};

pub const DEFAULT_FAST: i64 = 12;
pub const DEFAULT_SLOW: i64 = 26;
pub const DEFAULT_SIGNAL: i64 = 9;

pub struct MacdLines {
    pub line: Vec<f64>,
    pub histogram: Vec<f64>,
    pub signal: Vec<f64>,
}

pub fn macd(values: &[f64], fast: usize, slow: usize, signal: usize) -> MacdLines {
    let (fast, slow) = if slow < fast { (slow, fast) } else { (fast, slow) };
    let ema_fast = ema(values, fast);
    let ema_slow = ema(values, slow);
    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema(&line, signal);
    let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();
    MacdLines {
        line,
        histogram,
        signal,
    }
}

pub struct Macd;

const PARAMS: &[ParamSpec] = &[
    ParamSpec::column("close"),
    ParamSpec::int("fast", DEFAULT_FAST),
    ParamSpec::int("slow", DEFAULT_SLOW),
    ParamSpec::int("signal", DEFAULT_SIGNAL),
];

impl Indicator for Macd {
    fn name(&self) -> &'static str {
        "macd"
    }

    fn category(&self) -> Category {
        Category::Momentum
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn arity(&self) -> usize {
        3
    }

    fn compute(&self, frame: &Frame, args: &Args) -> Result<Vec<Output>, IndicatorError> {
        let close = args.series(frame, "close")?;
        let fast = args.period("fast")?;
        let slow = args.period("slow")?;
        let signal = args.period("signal")?;
        let suffix = format!("{}_{}_{}", fast.min(slow), fast.max(slow), signal);
        let lines = macd(close, fast, slow, signal);
        Ok(vec![
            Output::new(format!("MACD_{}", suffix), lines.line),
            Output::new(format!("MACDh_{}", suffix), lines.histogram),
            Output::new(format!("MACDs_{}", suffix), lines.signal),
        ])
    }
}
