//! Column naming resolver.
//!
//! Turns an indicator's natural outputs into the final labelled columns for one
//! descriptor:
//!
//! 1. `col_numbers` keeps only the selected outputs, in selection order.
//! 2. `prefix` / `suffix` decorate the auto-generated names (`VOL_SMA_20`).
//! 3. `col_names` replace names position by position; any remaining selected
//!    columns keep their (decorated) auto names. A single name is only valid
//!    when exactly one column remains.
//! 4. Names already present in the frame, or repeated within the batch, are
//!    duplicates. Permissive mode reports them and appends anyway; strict mode
//!    fails the descriptor.
//!
//! Names are never rewritten to dodge a collision: chained descriptors refer
//! to columns by their predictable name.

use crate::domain::descriptor::{ColNames, IndicatorDescriptor};
use crate::domain::error::IndicatorError;
use crate::domain::frame::{Column, Frame};
use crate::domain::indicator::Output;

#[derive(Debug, Clone, Default)]
pub struct Resolved {
    pub columns: Vec<(String, Column)>,
    /// Labels that collided with the frame or with each other.
    pub duplicates: Vec<String>,
}

impl Resolved {
    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|(n, _)| n.clone()).collect()
    }
}

pub fn resolve(
    descriptor: &IndicatorDescriptor,
    outputs: Vec<Output>,
    frame: &Frame,
    strict: bool,
) -> Result<Resolved, IndicatorError> {
    let selected = select(descriptor, outputs)?;
    let prefix = descriptor.kwarg_str("prefix");
    let suffix = descriptor.kwarg_str("suffix");

    let mut names: Vec<String> = selected
        .iter()
        .map(|o| decorate(&o.name, prefix, suffix))
        .collect();

    match &descriptor.col_names {
        None => {}
        Some(ColNames::Single(name)) => {
            if names.len() != 1 {
                return Err(IndicatorError::Naming(format!(
                    "single name '{}' given for {} columns",
                    name,
                    names.len()
                )));
            }
            names[0] = name.clone();
        }
        Some(ColNames::Many(given)) => {
            if given.len() > names.len() {
                return Err(IndicatorError::Naming(format!(
                    "{} names given for {} columns",
                    given.len(),
                    names.len()
                )));
            }
            for (slot, name) in names.iter_mut().zip(given) {
                *slot = name.clone();
            }
        }
    }

    let mut duplicates = Vec::new();
    for (i, name) in names.iter().enumerate() {
        if frame.contains(name) || names[..i].contains(name) {
            if strict {
                return Err(IndicatorError::DuplicateColumn(name.clone()));
            }
            duplicates.push(name.clone());
        }
    }

    let columns = names
        .into_iter()
        .zip(selected)
        .map(|(name, output)| (name, Column::from(output.values)))
        .collect();
    Ok(Resolved {
        columns,
        duplicates,
    })
}

fn select(
    descriptor: &IndicatorDescriptor,
    outputs: Vec<Output>,
) -> Result<Vec<Output>, IndicatorError> {
    let Some(numbers) = &descriptor.col_numbers else {
        return Ok(outputs);
    };
    if let Some(&bad) = numbers.iter().find(|&&n| n >= outputs.len()) {
        return Err(IndicatorError::Naming(format!(
            "col_numbers selects column {} of {}",
            bad,
            outputs.len()
        )));
    }
    let mut slots: Vec<Option<Output>> = outputs.into_iter().map(Some).collect();
    Ok(numbers.iter().filter_map(|&n| slots[n].take()).collect())
}

fn decorate(name: &str, prefix: Option<&str>, suffix: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(p) = prefix.filter(|p| !p.is_empty()) {
        out.push_str(p);
        out.push('_');
    }
    out.push_str(name);
    if let Some(s) = suffix.filter(|s| !s.is_empty()) {
        out.push('_');
        out.push_str(s);
    }
    out
}
