//! OBV (On-Balance Volume).

use crate::domain::category::Category;
use crate::domain::error::IndicatorError;
use crate::domain::frame::Frame;
use crate::domain::indicator::{Indicator, Output, after_leading_nan};
use crate::domain::params::{Args, ParamSpec};

/// OBV[0] = volume[0]
/// If close[i] > close[i-1]: OBV[i] = OBV[i-1] + volume[i]
/// If close[i] < close[i-1]: OBV[i] = OBV[i-1] - volume[i]
/// If close[i] == close[i-1]: OBV[i] = OBV[i-1]
///
/// No warmup period of its own. A chained `close` keeps its leading `NaN`s.
pub fn obv(close: &[f64], volume: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(close.len());
    let mut total = 0.0;
    for (i, (&c, &v)) in close.iter().zip(volume).enumerate() {
        if i == 0 {
            total = v;
        } else if c > close[i - 1] {
            total += v;
        } else if c < close[i - 1] {
            total -= v;
        }
        out.push(total);
    }
    out
}

pub struct Obv;

const PARAMS: &[ParamSpec] = &[ParamSpec::column("close"), ParamSpec::column("volume")];

impl Indicator for Obv {
    fn name(&self) -> &'static str {
        "obv"
    }

    fn category(&self) -> Category {
        Category::Volume
    }

    fn params(&self) -> &'static [ParamSpec] {
        PARAMS
    }

    fn arity(&self) -> usize {
        1
    }

    fn compute(&self, frame: &Frame, args: &Args) -> Result<Vec<Output>, IndicatorError> {
        let close = args.series(frame, "close")?;
        let volume = args.series(frame, "volume")?;
        let values = after_leading_nan(close, |c| obv(c, &volume[close.len() - c.len()..]));
        Ok(vec![Output::new("OBV", values)])
    }
}
