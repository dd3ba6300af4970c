#![allow(dead_code)]

use chrono::NaiveDate;
pub use tastudy::domain::ohlcv::OhlcvBar;
use tastudy::domain::error::StudyError;
use tastudy::domain::frame::Frame;
use tastudy::ports::data_port::DataPort;
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

pub const BASE_COLUMNS: usize = 5;

pub struct MockDataPort {
    pub frames: HashMap<String, Frame>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            frames: HashMap::new(),
        }
    }

    pub fn with_frame(mut self, name: &str, frame: Frame) -> Self {
        self.frames.insert(name.to_string(), frame);
        self
    }
}

impl DataPort for MockDataPort {
    fn load_frame(&self, name: &str) -> Result<Frame, StudyError> {
        self.frames.get(name).cloned().ok_or_else(|| StudyError::Data {
            reason: format!("no dataset named {}", name),
        })
    }

    fn list_datasets(&self) -> Result<Vec<String>, StudyError> {
        let mut names: Vec<String> = self.frames.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Bars following `closes`, opening at the previous close.
pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(2020, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            OhlcvBar {
                date: start + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1_000_000.0 + ((i * 7919) % 5000) as f64,
            }
        })
        .collect()
}

/// Deterministic wavy price series with drift.
pub fn sample_closes(rows: usize) -> Vec<f64> {
    (0..rows)
        .map(|i| {
            let x = i as f64;
            100.0 + 10.0 * (x * 0.1).sin() + 3.0 * (x * 0.37).cos() + 0.05 * x
        })
        .collect()
}

pub fn sample_frame(rows: usize) -> Frame {
    Frame::from_bars(&bars_from_closes(&sample_closes(rows)))
}

/// Column equality treating `NaN == NaN`.
pub fn same_values(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| (x.is_nan() && y.is_nan()) || x == y)
}

/// Assert both frames carry the same labels with identical data.
pub fn assert_frames_match(a: &Frame, b: &Frame) {
    assert_eq!(a.columns(), b.columns());
    for name in a.columns() {
        assert!(
            same_values(a.get(name).unwrap(), b.get(name).unwrap()),
            "column {name} differs"
        );
    }
}

/// Route engine logs to the test output. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
