//! # Task Scheduler
//!
//! Personal task management core: an in-memory store of users, categories
//! and tasks, plus a set of classic algorithms run against that data.
//!
//! ## Architecture Overview
//!
//! - **[`task`]**: data model, validation and the in-memory [`TaskStore`]
//! - **[`graph`]**: flow-network and cost-table construction, Prim's MST,
//!   Ford-Fulkerson / Edmonds-Karp / Dinic max flow, BFS/DFS traversal
//! - **[`text`]**: LCS name similarity and Huffman coding
//! - **[`analysis`]**: the [`TaskAnalyzer`] facade and [`AnalysisConfig`]
//! - **[`cli`]**: argument parsing, config discovery and dataset loading
//!   for the `taskscheduler` binary
//!
//! Every algorithm is synchronous and works on caller-supplied collections;
//! nothing is cached between calls.

/// Task, user and category model with the in-memory store.
pub mod task;

/// Graph construction and graph algorithms over task lists.
pub mod graph;

/// String algorithms over task and category names.
pub mod text;

/// High-level analysis facade and its configuration.
pub mod analysis;

/// Environment constants and path utilities.
pub mod env;

// CLI module for command-line interface
pub mod cli;

pub use analysis::{AnalysisConfig, FlowSummary, TaskAnalyzer, TaskMst};
pub use graph::{
    CostDifference, CostModel, CostTable, FlowAlgorithm, MstResult, RandomCosts, Traversal,
    UncategorizedPolicy,
};
pub use task::{
    AnalysisError, Category, CategoryId, Dataset, Task, TaskId, TaskStore, User, UserId,
};
pub use text::{HuffmanCode, SimilarTaskPair, similarity};
