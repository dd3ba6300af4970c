//! Reporting sink port trait.

use std::time::Duration;

/// Receives one row per study run: what ran, how many columns it added, and
/// how long it took. Not needed for correctness; used for speed tables.
pub trait ReportPort {
    fn record(&mut self, label: &str, columns: usize, elapsed: Duration);
}
