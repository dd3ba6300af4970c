//! Indicator registry: lower-case key to implementation, in registration order.
//!
//! Implementations are validated when registered, so a kind that resolves is
//! known to have a well-formed parameter schema. The only lookup failure left
//! at run time is a genuinely unknown kind from user input.

use crate::domain::error::StudyError;
use crate::domain::indicator::{
    Indicator, atr, bollinger, ebsw, ema, fisher, heikin_ashi, macd, obv, returns, roc, rsi, sma,
    stddev, trend, wma,
};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct IndicatorRegistry {
    indicators: Vec<Arc<dyn Indicator>>,
    index: HashMap<String, usize>,
}

impl IndicatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in catalog.
    pub fn builtin() -> Result<Self, StudyError> {
        let mut registry = Self::new();
        registry.register(heikin_ashi::Ha)?;
        registry.register(ebsw::Ebsw)?;
        registry.register(rsi::Rsi)?;
        registry.register(macd::Macd)?;
        registry.register(roc::Roc)?;
        registry.register(roc::Mom)?;
        registry.register(fisher::Fisher)?;
        registry.register(sma::Sma)?;
        registry.register(ema::Ema)?;
        registry.register(wma::Wma)?;
        registry.register(returns::LogReturn)?;
        registry.register(returns::PercentReturn)?;
        registry.register(stddev::Stdev)?;
        registry.register(trend::Increasing)?;
        registry.register(trend::Decreasing)?;
        registry.register(bollinger::BBands)?;
        registry.register(atr::Atr)?;
        registry.register(obv::Obv)?;
        Ok(registry)
    }

    pub fn register<I: Indicator + 'static>(&mut self, indicator: I) -> Result<(), StudyError> {
        self.register_arc(Arc::new(indicator))
    }

    pub fn register_arc(&mut self, indicator: Arc<dyn Indicator>) -> Result<(), StudyError> {
        validate(indicator.as_ref())?;
        let key = indicator.name().to_string();
        if self.index.contains_key(&key) {
            return Err(StudyError::Registration {
                reason: format!("'{}' is already registered", key),
            });
        }
        self.index.insert(key, self.indicators.len());
        self.indicators.push(indicator);
        Ok(())
    }

    /// Case-insensitive lookup.
    pub fn resolve(&self, kind: &str) -> Option<Arc<dyn Indicator>> {
        self.index
            .get(&kind.to_lowercase())
            .map(|&i| Arc::clone(&self.indicators[i]))
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.index.contains_key(&kind.to_lowercase())
    }

    /// Indicators in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Indicator>> {
        self.indicators.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.indicators.iter().map(|i| i.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

fn validate(indicator: &dyn Indicator) -> Result<(), StudyError> {
    let name = indicator.name();
    let fail = |reason: String| Err(StudyError::Registration { reason });

    if name.is_empty() {
        return fail("indicator key must not be empty".into());
    }
    if name != name.to_lowercase() {
        return fail(format!("indicator key '{}' must be lower-case", name));
    }
    if indicator.arity() == 0 {
        return fail(format!("'{}' must produce at least one column", name));
    }
    let params = indicator.params();
    for (i, spec) in params.iter().enumerate() {
        if params[..i].iter().any(|other| other.name == spec.name) {
            return fail(format!("'{}' declares parameter '{}' twice", name, spec.name));
        }
        if !spec.is_consistent() {
            return fail(format!(
                "'{}' parameter '{}' default does not match its kind",
                name, spec.name
            ));
        }
    }
    Ok(())
}
