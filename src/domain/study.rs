//! Study definitions: a named, ordered batch of indicator descriptors.
//!
//! The descriptor list is copied into shared immutable storage on
//! construction. A run works from that storage, so nothing the caller does
//! with its own descriptors afterwards can change a study mid-run.

use crate::domain::category::{Category, CategoryRegistry};
use crate::domain::descriptor::IndicatorDescriptor;
use crate::domain::error::StudyError;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Study {
    pub name: String,
    pub description: String,
    ta: Arc<[IndicatorDescriptor]>,
    /// Worker count for this study; `None` uses the caller's options.
    pub cores: Option<usize>,
}

impl Study {
    pub fn new<I>(name: impl Into<String>, ta: I) -> Result<Self, StudyError>
    where
        I: IntoIterator<Item = IndicatorDescriptor>,
    {
        let study = Self {
            name: name.into(),
            description: String::new(),
            ta: ta.into_iter().collect(),
            cores: None,
        };
        study.validate()?;
        Ok(study)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_cores(mut self, cores: usize) -> Self {
        self.cores = Some(cores);
        self
    }

    /// Every built-in indicator with default parameters, category by category.
    pub fn all(categories: &CategoryRegistry) -> Result<Self, StudyError> {
        Ok(Self::new("All", categories.all())?
            .with_description("All the indicators with their default settings."))
    }

    /// Every indicator of one category, with default parameters.
    pub fn category(categories: &CategoryRegistry, name: &str) -> Result<Self, StudyError> {
        let category: Category = name.parse()?;
        let ta = categories.get(category).to_vec();
        Ok(Self::new(category.as_str(), ta)?
            .with_description(format!("All {} indicators with their default settings.", category)))
    }

    /// Common price SMAs (10, 20, 50, 200) and a 20 period volume SMA.
    pub fn common() -> Self {
        let price = [10i64, 20, 50, 200]
            .into_iter()
            .map(|length| IndicatorDescriptor::new("sma").arg("length", length));
        let volume = IndicatorDescriptor::new("sma")
            .arg("close", "volume")
            .arg("length", 20i64)
            .arg("prefix", "VOL");
        Self {
            name: "Common Price and Volume SMAs".into(),
            description: "Common Price SMAs: 10, 20, 50, 200 and Volume SMA: 20.".into(),
            ta: price.chain(std::iter::once(volume)).collect(),
            cores: None,
        }
    }

    pub fn descriptors(&self) -> &[IndicatorDescriptor] {
        &self.ta
    }

    pub fn len(&self) -> usize {
        self.ta.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ta.is_empty()
    }

    /// Same name, description and cores over a different descriptor list.
    pub(crate) fn derive(&self, ta: Vec<IndicatorDescriptor>) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            ta: ta.into(),
            cores: self.cores,
        }
    }

    pub fn validate(&self) -> Result<(), StudyError> {
        if self.name.trim().is_empty() {
            return Err(StudyError::EmptyStudyName);
        }
        if self.ta.is_empty() {
            return Err(StudyError::EmptyStudy {
                name: self.name.clone(),
            });
        }
        for descriptor in self.ta.iter() {
            descriptor.validate_shape()?;
        }
        Ok(())
    }
}
