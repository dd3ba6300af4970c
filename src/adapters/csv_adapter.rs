//! CSV file data adapter.
//!
//! One dataset per `{name}.csv` under the base directory. The first column is
//! the date (`YYYY-MM-DD`); every other column is read as `f64` under its
//! lower-cased header. Empty cells load as `NaN`.

use crate::domain::error::StudyError;
use crate::domain::frame::Frame;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, name: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", name))
    }
}

fn parse_cell(cell: &str, column: &str, row: usize) -> Result<f64, StudyError> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse().map_err(|e| StudyError::Data {
        reason: format!("row {}: invalid {} value '{}': {}", row, column, cell, e),
    })
}

impl DataPort for CsvAdapter {
    fn load_frame(&self, name: &str) -> Result<Frame, StudyError> {
        let path = self.csv_path(name);
        let content = fs::read_to_string(&path).map_err(|e| StudyError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| StudyError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .iter()
            .skip(1)
            .map(|h| h.trim().to_lowercase())
            .collect();

        let mut rows: Vec<(NaiveDate, Vec<f64>)> = Vec::new();
        for (i, result) in rdr.records().enumerate() {
            let row = i + 1;
            let record = result.map_err(|e| StudyError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| StudyError::Data {
                reason: format!("row {}: missing date column", row),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                StudyError::Data {
                    reason: format!("row {}: invalid date format: {}", row, e),
                }
            })?;

            let values = headers
                .iter()
                .enumerate()
                .map(|(j, column)| parse_cell(record.get(j + 1).unwrap_or(""), column, row))
                .collect::<Result<Vec<f64>, StudyError>>()?;
            rows.push((date, values));
        }

        rows.sort_by_key(|(date, _)| *date);

        let mut frame = Frame::new(rows.iter().map(|(date, _)| *date).collect());
        for (j, column) in headers.iter().enumerate() {
            let values: Vec<f64> = rows.iter().map(|(_, values)| values[j]).collect();
            frame
                .append(column.as_str(), values, true)
                .map_err(|e| StudyError::Data {
                    reason: format!("{}: {}", path.display(), e),
                })?;
        }

        debug!(dataset = name, rows = frame.rows(), columns = headers.len(), "dataset loaded");
        Ok(frame)
    }

    fn list_datasets(&self) -> Result<Vec<String>, StudyError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StudyError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StudyError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if let Some(stem) = file_name.strip_suffix(".csv") {
                names.push(stem.to_string());
            }
        }

        names.sort();
        Ok(names)
    }
}
