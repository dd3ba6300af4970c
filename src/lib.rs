//! tastudy: runs batches of technical-analysis indicators ("studies") over a
//! price dataset and appends the results as new columns.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;

pub use domain::descriptor::{ColNames, IndicatorDescriptor};
pub use domain::dispatcher::{ExecutionMode, Selector, StudyEngine, StudyReport};
pub use domain::error::{IndicatorError, StudyError};
pub use domain::frame::Frame;
pub use domain::options::StudyOptions;
pub use domain::study::Study;
