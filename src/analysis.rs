//! # Task Analysis Facade
//!
//! Runs the graph and text engines against the contents of a
//! [`TaskStore`]. The acting user and every other piece of context is an
//! explicit argument; the analyzer holds no session state.
//!
//! ## Core Components
//!
//! - **[`TaskAnalyzer`]**: borrows a store and a config, exposes one method
//!   per analysis
//! - **[`AnalysisConfig`]**: thresholds, default algorithms and the random
//!   cost seed, loadable from TOML
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                TaskAnalyzer                  │
//! │  ┌───────────┐ ┌───────────┐ ┌─────────────┐ │
//! │  │ MST/Flow  │ │ Traversal │ │ LCS/Huffman │ │
//! │  └───────────┘ └───────────┘ └─────────────┘ │
//! │                 TaskStore                    │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use taskscheduler::{AnalysisConfig, FlowAlgorithm, TaskAnalyzer, TaskStore};
//!
//! let mut store = TaskStore::new();
//! let owner = store.register_user("ada@example.com", "hash").unwrap();
//! store.create_task(owner, "write report", "", 10.0).unwrap();
//! store.create_task(owner, "review report", "", 20.0).unwrap();
//!
//! let config = AnalysisConfig::default();
//! let analyzer = TaskAnalyzer::new(&store, &config);
//! let tasks = store.tasks_owned_by(owner);
//! let summary = analyzer.max_flow(&tasks, FlowAlgorithm::Dinic).unwrap();
//! assert_eq!(summary.total_flow, 30.0);
//! ```

use crate::graph::{
    CostModel, CostTable, FlowAlgorithm, FlowNetwork, MstResult, RandomCosts, Traversal,
    UncategorizedPolicy, build_flow_network, find_similar_users, prim_mst,
};
use crate::task::{AnalysisError, Task, TaskId, TaskStore, User};
use crate::text::{DEFAULT_SIMILARITY_THRESHOLD, HuffmanCode, SimilarTaskPair, similar_task_pairs};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Tunables for the analysis engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Minimum LCS ratio for a task pair to be reported
    pub similarity_threshold: f64,
    /// Whether uncategorized tasks count as sharing a category
    pub uncategorized_policy: UncategorizedPolicy,
    pub default_flow_algorithm: FlowAlgorithm,
    pub default_traversal: Traversal,
    /// Seed for random MST edge costs; entropy when absent
    pub cost_seed: Option<u64>,
    /// Days ahead covered by the reminder listing
    pub reminder_window_days: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            uncategorized_policy: UncategorizedPolicy::default(),
            default_flow_algorithm: FlowAlgorithm::EdmondsKarp,
            default_traversal: Traversal::Bfs,
            cost_seed: None,
            reminder_window_days: 7,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_toml_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content).context("Failed to write config file")
    }

    /// Convert configuration to a TOML string
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Reject thresholds outside `[0, 1]`
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            anyhow::bail!(
                "similarity_threshold must be within [0, 1], got {}",
                self.similarity_threshold
            );
        }
        Ok(())
    }

    /// Random cost model honouring `cost_seed`
    pub fn random_costs(&self) -> RandomCosts {
        match self.cost_seed {
            Some(seed) => RandomCosts::seeded(seed),
            None => RandomCosts::new(),
        }
    }
}

/// Max-flow outcome with the network that carries it
#[derive(Debug, Clone, Serialize)]
pub struct FlowSummary {
    pub algorithm: FlowAlgorithm,
    pub total_flow: f64,
    pub network: FlowNetwork,
}

/// MST over a task list, with node `i` standing for `task_ids[i]`
#[derive(Debug, Clone, Serialize)]
pub struct TaskMst {
    pub task_ids: Vec<TaskId>,
    pub costs: CostTable,
    pub tree: MstResult,
}

/// Entry point for every analysis over a store
pub struct TaskAnalyzer<'a> {
    store: &'a TaskStore,
    config: &'a AnalysisConfig,
}

impl<'a> TaskAnalyzer<'a> {
    pub fn new(store: &'a TaskStore, config: &'a AnalysisConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.config
    }

    /// Prim's MST over `tasks` with edge costs drawn from `cost_model`
    pub fn compute_mst(
        &self,
        tasks: &[&Task],
        cost_model: &mut dyn CostModel,
    ) -> Result<TaskMst, AnalysisError> {
        ensure_pairs("minimum spanning tree", tasks.len())?;
        let costs = cost_model.cost_table(tasks);
        self.compute_mst_with_costs(tasks, costs)
    }

    /// Prim's MST over `tasks` using a caller-supplied cost table
    pub fn compute_mst_with_costs(
        &self,
        tasks: &[&Task],
        costs: CostTable,
    ) -> Result<TaskMst, AnalysisError> {
        ensure_pairs("minimum spanning tree", tasks.len())?;
        if costs.len() != tasks.len() {
            return Err(AnalysisError::invalid(format!(
                "cost table covers {} nodes but {} tasks were given",
                costs.len(),
                tasks.len()
            )));
        }

        let tree = prim_mst(&costs, 0)?;
        info!(
            "MST over {} tasks has total weight {:.3}",
            tasks.len(),
            tree.total_weight()
        );
        Ok(TaskMst {
            task_ids: tasks.iter().map(|t| t.id).collect(),
            costs,
            tree,
        })
    }

    /// Maximum flow from the virtual source through `tasks` to the sink
    pub fn max_flow(
        &self,
        tasks: &[&Task],
        algorithm: FlowAlgorithm,
    ) -> Result<FlowSummary, AnalysisError> {
        let mut network = build_flow_network(tasks)?;
        let total_flow = algorithm.run(&mut network);

        info!(
            "{} max flow over {} tasks: {}",
            algorithm,
            tasks.len(),
            total_flow
        );
        Ok(FlowSummary {
            algorithm,
            total_flow,
            network,
        })
    }

    /// Distinct owners of tasks sharing the start task's category.
    ///
    /// Empty when the start task is unknown or the store holds fewer than
    /// two tasks or two users.
    pub fn find_similar_users(&self, start: TaskId, traversal: Traversal) -> Vec<&'a User> {
        let tasks = self.store.tasks();
        let users = self.store.users();
        if tasks.len() < 2 || users.len() < 2 {
            debug!(
                "Similar-user search needs two tasks and two users, have {} and {}",
                tasks.len(),
                users.len()
            );
            return Vec::new();
        }

        find_similar_users(
            tasks,
            users,
            start,
            traversal,
            self.config.uncategorized_policy,
        )
    }

    /// Task pairs whose names reach the configured similarity threshold
    pub fn find_similar_task_pairs<'t>(&self, tasks: &[&'t Task]) -> Vec<SimilarTaskPair<'t>> {
        similar_task_pairs(tasks, self.config.similarity_threshold)
    }

    /// Huffman codes for `text`
    pub fn build_huffman_codes(&self, text: &str) -> HuffmanCode {
        HuffmanCode::build(text)
    }

    /// Huffman codes for the store's category names, with the encoded blob
    pub fn encode_categories(&self) -> Result<(String, HuffmanCode, String), AnalysisError> {
        let text = self.store.category_text();
        let code = HuffmanCode::build(&text);
        let bits = code.encode(&text)?;
        Ok((text, code, bits))
    }
}

fn ensure_pairs(operation: &'static str, actual: usize) -> Result<(), AnalysisError> {
    if actual < 2 {
        return Err(AnalysisError::InsufficientData {
            operation,
            required: 2,
            actual,
        });
    }
    Ok(())
}
