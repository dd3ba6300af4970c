//! Tabular time-series dataset.
//!
//! A [`Frame`] is a date index plus an ordered list of labelled `f64` columns.
//! Column data is reference counted, so cloning a frame is a cheap read-only
//! snapshot that worker threads can share.
//!
//! Labels are not required to be unique: in the default (permissive) mode an
//! append may create a second column with an existing label. Lookups by name
//! return the first column carrying that label, and [`Frame::drop`] removes
//! every column with a matching label.

use crate::domain::error::IndicatorError;
use crate::domain::ohlcv::{OHLCV_COLUMNS, OhlcvBar};
use chrono::NaiveDate;
use std::sync::Arc;

pub type Column = Arc<[f64]>;

#[derive(Debug, Clone, Default)]
pub struct Frame {
    index: Vec<NaiveDate>,
    columns: Vec<(String, Column)>,
}

impl Frame {
    pub fn new(index: Vec<NaiveDate>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Build an `open, high, low, close, volume` frame from bars.
    pub fn from_bars(bars: &[OhlcvBar]) -> Self {
        let mut frame = Frame::new(bars.iter().map(|b| b.date).collect());
        for name in OHLCV_COLUMNS {
            let values: Vec<f64> = bars.iter().filter_map(|b| b.field(name)).collect();
            frame.columns.push((name.to_string(), values.into()));
        }
        frame
    }

    pub fn index(&self) -> &[NaiveDate] {
        &self.index
    }

    /// Column labels in frame order.
    pub fn columns(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_ref())
    }

    /// Like [`Frame::get`] but reports a missing column as an indicator error.
    pub fn require(&self, name: &str) -> Result<&[f64], IndicatorError> {
        self.get(name)
            .ok_or_else(|| IndicatorError::MissingColumn(name.to_string()))
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.index.len(), self.columns.len())
    }

    pub fn rows(&self) -> usize {
        self.index.len()
    }

    /// Append a column. With `strict`, an existing label is rejected;
    /// otherwise a duplicate label is appended alongside it.
    pub fn append(
        &mut self,
        name: impl Into<String>,
        values: impl Into<Column>,
        strict: bool,
    ) -> Result<(), IndicatorError> {
        let name = name.into();
        let values = values.into();
        if values.len() != self.rows() {
            return Err(IndicatorError::LengthMismatch {
                name,
                got: values.len(),
                expected: self.rows(),
            });
        }
        if strict && self.contains(&name) {
            return Err(IndicatorError::DuplicateColumn(name));
        }
        self.columns.push((name, values));
        Ok(())
    }

    /// Append several columns in order. Validation happens up front so that
    /// either every column is appended or none is.
    pub fn concat(
        &mut self,
        columns: Vec<(String, Column)>,
        strict: bool,
    ) -> Result<(), IndicatorError> {
        for (i, (name, values)) in columns.iter().enumerate() {
            if values.len() != self.rows() {
                return Err(IndicatorError::LengthMismatch {
                    name: name.clone(),
                    got: values.len(),
                    expected: self.rows(),
                });
            }
            if strict
                && (self.contains(name) || columns[..i].iter().any(|(other, _)| other == name))
            {
                return Err(IndicatorError::DuplicateColumn(name.clone()));
            }
        }
        self.columns.extend(columns);
        Ok(())
    }

    /// Remove every column whose label is in `names`. Returns how many were removed.
    pub fn drop<S: AsRef<str>>(&mut self, names: &[S]) -> usize {
        let before = self.columns.len();
        self.columns
            .retain(|(n, _)| !names.iter().any(|d| d.as_ref() == n));
        before - self.columns.len()
    }

    /// Labels of the columns after position `start`, used to report what a run added.
    pub fn columns_from(&self, start: usize) -> Vec<String> {
        self.columns
            .iter()
            .skip(start)
            .map(|(n, _)| n.clone())
            .collect()
    }
}
