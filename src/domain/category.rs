//! Indicator categories and the per-category default studies.

use crate::domain::descriptor::IndicatorDescriptor;
use crate::domain::error::StudyError;
use crate::domain::indicator::IndicatorRegistry;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Candles,
    Cycles,
    Momentum,
    Overlap,
    Performance,
    Statistics,
    Trend,
    Volatility,
    Volume,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Candles,
        Category::Cycles,
        Category::Momentum,
        Category::Overlap,
        Category::Performance,
        Category::Statistics,
        Category::Trend,
        Category::Volatility,
        Category::Volume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Candles => "candles",
            Category::Cycles => "cycles",
            Category::Momentum => "momentum",
            Category::Overlap => "overlap",
            Category::Performance => "performance",
            Category::Statistics => "statistics",
            Category::Trend => "trend",
            Category::Volatility => "volatility",
            Category::Volume => "volume",
        }
    }

    /// Comma separated list of every category name, for error messages.
    pub fn valid_names() -> String {
        Category::ALL
            .iter()
            .map(Category::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = StudyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| StudyError::UnknownCategory {
                name: s.to_string(),
                valid: Category::valid_names(),
            })
    }
}

/// Category name to default-parameter descriptors for every indicator in it.
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    entries: BTreeMap<Category, Vec<IndicatorDescriptor>>,
}

impl CategoryRegistry {
    /// Group the registry's indicators by category, keeping registration order.
    pub fn from_indicators(registry: &IndicatorRegistry) -> Self {
        let mut entries: BTreeMap<Category, Vec<IndicatorDescriptor>> = BTreeMap::new();
        for indicator in registry.iter() {
            entries
                .entry(indicator.category())
                .or_default()
                .push(IndicatorDescriptor::new(indicator.name()));
        }
        Self { entries }
    }

    pub fn get(&self, category: Category) -> &[IndicatorDescriptor] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Case-insensitive lookup by name.
    pub fn lookup(&self, name: &str) -> Result<&[IndicatorDescriptor], StudyError> {
        let category: Category = name.parse()?;
        Ok(self.get(category))
    }

    /// Names of the categories that have at least one indicator.
    pub fn all_categories(&self) -> Vec<&'static str> {
        self.entries.keys().map(Category::as_str).collect()
    }

    /// Every descriptor, category by category.
    pub fn all(&self) -> Vec<IndicatorDescriptor> {
        self.entries.values().flatten().cloned().collect()
    }
}
