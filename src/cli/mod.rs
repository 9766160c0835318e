//! CLI-specific functionality for the task scheduler
//!
//! This module contains all CLI-related code including argument parsing,
//! configuration discovery and dataset loading.

pub mod args;
pub mod config;
pub mod dataset;

pub use args::{AnalysisCommand, AnalysisRequest, Args, CostArg, ExecutionMode};
pub use config::ConfigDiscovery;
pub use dataset::{DatasetError, DatasetLoader};
