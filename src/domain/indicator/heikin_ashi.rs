//! Heikin-Ashi candles.
//!
//! HA_close = (O + H + L + C) / 4
//! HA_open[0] = (O[0] + C[0]) / 2, then (HA_open[i-1] + HA_close[i-1]) / 2
//! HA_high = max(H, HA_open, HA_close)
//! HA_low = min(L, HA_open, HA_close)
//! No warmup period.

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{Indicator, Output};
use crate::domain::params::{Args, ParamSpec};

pub struct Candles {
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
}

pub fn heikin_ashi(open: &[f64], high: &[f64], low: &[f64], close: &[f64]) -> Candles {
    let len = open.len().min(high.len()).min(low.len()).min(close.len());
    let mut candles = Candles {
        open: Vec::with_capacity(len),
        high: Vec::with_capacity(len),
        low: Vec::with_capacity(len),
        close: Vec::with_capacity(len),
    };

    for i in 0..len {
        let ha_close = (open[i] + high[i] + low[i] + close[i]) / 4.0;
        let ha_open = if i == 0 {
            (open[0] + close[0]) / 2.0
        } else {
            (candles.open[i - 1] + candles.close[i - 1]) / 2.0
        };
        candles.high.push(high[i].max(ha_open).max(ha_close));
        candles.low.push(low[i].min(ha_open).min(ha_close));
        candles.open.push(ha_open);
        candles.close.push(ha_close);
    }
    candles
}

pub struct Ha;

const PARAMS: &[ParamSpec] = &[
    ParamSpec::column("open"),
    ParamSpec::column("high"),
    ParamSpec::column("low"),
    ParamSpec::column("close"),
];

impl Indicator for Ha {
    fn name(&self) -> &'static str {
        "ha"
    }

    fn category(&self) -> Category {
        Category::Candles
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn arity(&self) -> usize {
        4
    }

    fn compute(&self, frame: &Frame, args: &Args) -> Result<Vec<Output>, IndicatorError> {
        let candles = heikin_ashi(
            args.series(frame, "open")?,
            args.series(frame, "high")?,
            args.series(frame, "low")?,
            args.series(frame, "close")?,
        );
        Ok(vec![
            Output::new("HA_open", candles.open),
            Output::new("HA_high", candles.high),
            Output::new("HA_low", candles.low),
            Output::new("HA_close", candles.close),
        ])
    }
}
