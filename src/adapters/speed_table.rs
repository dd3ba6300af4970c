//! In-memory speed table.
//!
//! Collects one row per study run and renders a plain-text table with
//! totals. Recording a label a second time replaces that row in place.

use crate::ports::report_port::ReportPort;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeedRow {
    pub label: String,
    pub columns: usize,
    pub seconds: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SpeedTable {
    rows: Vec<SpeedRow>,
    cumulative: bool,
}

impl SpeedTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a running total of seconds to the rendered table.
    pub fn with_cumulative(mut self) -> Self {
        self.cumulative = true;
        self
    }

    pub fn rows(&self) -> &[SpeedRow] {
        &self.rows
    }

    pub fn total_columns(&self) -> usize {
        self.rows.iter().map(|r| r.columns).sum()
    }

    pub fn total_seconds(&self) -> f64 {
        self.rows.iter().map(|r| r.seconds).sum()
    }

    /// `None` until some time has been recorded.
    pub fn columns_per_second(&self) -> Option<f64> {
        let seconds = self.total_seconds();
        if seconds > 0.0 {
            Some(self.total_columns() as f64 / seconds)
        } else {
            None
        }
    }

    pub fn render(&self) -> String {
        let width = self
            .rows
            .iter()
            .map(|r| r.label.len())
            .max()
            .unwrap_or(0)
            .max("Test".len());

        let mut out = String::new();
        out.push_str(&format!(
            "{:<width$}  {:>7}  {:>10}",
            "Test", "Columns", "Seconds"
        ));
        if self.cumulative {
            out.push_str(&format!("  {:>12}", "Cum. Seconds"));
        }
        out.push('\n');

        let mut running = 0.0;
        for row in &self.rows {
            running += row.seconds;
            out.push_str(&format!(
                "{:<width$}  {:>7}  {:>10.5}",
                row.label, row.columns, row.seconds
            ));
            if self.cumulative {
                out.push_str(&format!("  {:>12.5}", running));
            }
            out.push('\n');
        }

        out.push_str(&format!("Total Columns added: {}\n", self.total_columns()));
        out.push_str(&format!(
            "Total Seconds for All Tests: {:.5}\n",
            self.total_seconds()
        ));
        if let Some(cps) = self.columns_per_second() {
            out.push_str(&format!(
                "Total Columns / Second for All Tests: {:.5}\n",
                cps
            ));
        }
        out
    }
}

impl ReportPort for SpeedTable {
    fn record(&mut self, label: &str, columns: usize, elapsed: Duration) {
        let row = SpeedRow {
            label: label.to_string(),
            columns,
            seconds: elapsed.as_secs_f64(),
        };
        match self.rows.iter_mut().find(|r| r.label == label) {
            Some(existing) => *existing = row,
            None => self.rows.push(row),
        }
    }
}
