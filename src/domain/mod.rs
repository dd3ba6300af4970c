//! Core domain types and logic: datasets, descriptors, studies and the
//! executors that run them.

pub mod ohlcv;
pub mod frame;
pub mod value;
pub mod params;
pub mod descriptor;
pub mod descriptor_parser;
pub mod indicator;
pub mod category;
pub mod study;
pub mod options;
pub mod naming;
pub mod context;
pub mod sequential;
pub mod parallel;
pub mod dispatcher;
pub mod config_validation;
pub mod run_config;
pub mod error;
