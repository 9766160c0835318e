//! Graph construction from task lists.
//!
//! Two shapes are produced: a source/sink flow network whose per-task
//! capacities are the task costs, and a complete undirected cost table
//! used by the MST engine.

use crate::task::types::{AnalysisError, Task};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::ops::Range;
use tracing::debug;

/// Default range for randomly generated edge costs
pub const RANDOM_COST_RANGE: Range<f64> = 1.0..10.0;

/// Directed edge of a residual network.
///
/// Edges are stored in pairs: the forward edge at an even index and its
/// zero-capacity reverse at the following odd index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlowEdge {
    pub from: usize,
    pub to: usize,
    pub capacity: f64,
    pub flow: f64,
}

impl FlowEdge {
    pub fn residual(&self) -> f64 {
        self.capacity - self.flow
    }
}

/// Residual network with adjacency lists of edge indices
#[derive(Debug, Clone, Serialize)]
pub struct FlowNetwork {
    edges: Vec<FlowEdge>,
    adjacency: Vec<Vec<usize>>,
    source: usize,
    sink: usize,
}

impl FlowNetwork {
    /// Create a network with `node_count` nodes and no edges
    pub fn new(node_count: usize, source: usize, sink: usize) -> Result<Self, AnalysisError> {
        if source >= node_count || sink >= node_count {
            return Err(AnalysisError::invalid(format!(
                "source {source} or sink {sink} outside network of {node_count} nodes"
            )));
        }
        Ok(Self {
            edges: Vec::new(),
            adjacency: vec![Vec::new(); node_count],
            source,
            sink,
        })
    }

    /// Add a forward edge and its zero-capacity reverse.
    ///
    /// Returns the index of the forward edge.
    pub fn add_edge(&mut self, from: usize, to: usize, capacity: f64) -> Result<usize, AnalysisError> {
        let node_count = self.adjacency.len();
        if from >= node_count || to >= node_count {
            return Err(AnalysisError::invalid(format!(
                "edge {from}->{to} outside network of {node_count} nodes"
            )));
        }
        if !capacity.is_finite() || capacity < 0.0 {
            return Err(AnalysisError::invalid(format!(
                "edge {from}->{to} has invalid capacity {capacity}"
            )));
        }

        let forward = self.edges.len();
        self.edges.push(FlowEdge {
            from,
            to,
            capacity,
            flow: 0.0,
        });
        self.edges.push(FlowEdge {
            from: to,
            to: from,
            capacity: 0.0,
            flow: 0.0,
        });
        self.adjacency[from].push(forward);
        self.adjacency[to].push(forward + 1);
        Ok(forward)
    }

    /// Push `amount` along edge `index`, mirroring it on the paired edge
    pub(crate) fn push(&mut self, index: usize, amount: f64) {
        self.edges[index].flow += amount;
        self.edges[index ^ 1].flow -= amount;
    }

    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    pub fn edge(&self, index: usize) -> &FlowEdge {
        &self.edges[index]
    }

    pub(crate) fn outgoing(&self, node: usize) -> &[usize] {
        &self.adjacency[node]
    }

    /// Forward edges only, in insertion order
    pub fn forward_edges(&self) -> impl Iterator<Item = &FlowEdge> {
        self.edges.iter().step_by(2)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn source(&self) -> usize {
        self.source
    }

    pub fn sink(&self) -> usize {
        self.sink
    }

    /// Net flow leaving the source
    pub fn flow_value(&self) -> f64 {
        self.forward_edges()
            .filter(|e| e.from == self.source)
            .map(|e| e.flow)
            .sum::<f64>()
            - self
                .forward_edges()
                .filter(|e| e.to == self.source)
                .map(|e| e.flow)
                .sum::<f64>()
    }

    /// Flow entering minus flow leaving `node`, over forward edges
    pub fn net_inflow(&self, node: usize) -> f64 {
        self.forward_edges()
            .map(|e| {
                if e.to == node {
                    e.flow
                } else if e.from == node {
                    -e.flow
                } else {
                    0.0
                }
            })
            .sum()
    }
}

/// Build the source → task → sink network.
///
/// Node 0 is the source, nodes `1..=n` are the tasks in input order and
/// node `n + 1` is the sink. Both edges of a task carry its cost.
pub fn build_flow_network(tasks: &[&Task]) -> Result<FlowNetwork, AnalysisError> {
    let n = tasks.len();
    let source = 0;
    let sink = n + 1;
    let mut network = FlowNetwork::new(n + 2, source, sink)?;

    for (offset, task) in tasks.iter().enumerate() {
        task.validate_cost()?;
        let node = offset + 1;
        network.add_edge(source, node, task.cost)?;
        network.add_edge(node, sink, task.cost)?;
    }

    debug!(
        "Built flow network with {} nodes and {} edges",
        network.node_count(),
        network.edges().len()
    );
    Ok(network)
}

/// Symmetric pairwise cost matrix over task nodes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostTable {
    costs: Vec<Vec<f64>>,
}

impl CostTable {
    /// Table of `n` nodes with every pairwise cost set to zero
    pub fn zeroed(n: usize) -> Self {
        Self {
            costs: vec![vec![0.0; n]; n],
        }
    }

    /// Build from a full matrix, checking shape, values and symmetry
    pub fn from_matrix(costs: Vec<Vec<f64>>) -> Result<Self, AnalysisError> {
        let n = costs.len();
        if let Some((i, row)) = costs.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(AnalysisError::invalid(format!(
                "cost row {i} has {} entries, expected {n}",
                row.len()
            )));
        }

        for (i, row) in costs.iter().enumerate() {
            for (j, &cost) in row.iter().enumerate() {
                if !cost.is_finite() || cost < 0.0 {
                    return Err(AnalysisError::invalid(format!(
                        "cost between {i} and {j} is {cost}"
                    )));
                }
                if cost != costs[j][i] {
                    return Err(AnalysisError::invalid(format!(
                        "cost table is not symmetric at ({i}, {j})"
                    )));
                }
            }
        }
        Ok(Self { costs })
    }

    /// Set the cost of the undirected edge `a`–`b`
    pub fn set(&mut self, a: usize, b: usize, cost: f64) {
        self.costs[a][b] = cost;
        self.costs[b][a] = cost;
    }

    pub fn cost(&self, a: usize, b: usize) -> f64 {
        self.costs[a][b]
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

/// Source of pairwise edge costs for the complete task graph
pub trait CostModel {
    fn edge_cost(&mut self, a: &Task, b: &Task) -> f64;

    /// Fill a complete symmetric table over `tasks`
    fn cost_table(&mut self, tasks: &[&Task]) -> CostTable {
        let mut table = CostTable::zeroed(tasks.len());
        for i in 0..tasks.len() {
            for j in (i + 1)..tasks.len() {
                let cost = self.edge_cost(tasks[i], tasks[j]);
                table.set(i, j, cost);
            }
        }
        table
    }
}

/// Uniform random costs in `[1, 10)`
pub struct RandomCosts {
    rng: StdRng,
    range: Range<f64>,
}

impl RandomCosts {
    /// Random costs from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
            range: RANDOM_COST_RANGE,
        }
    }

    /// Reproducible random costs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            range: RANDOM_COST_RANGE,
        }
    }
}

impl Default for RandomCosts {
    fn default() -> Self {
        Self::new()
    }
}

impl CostModel for RandomCosts {
    fn edge_cost(&mut self, _a: &Task, _b: &Task) -> f64 {
        self.rng.random_range(self.range.clone())
    }
}

/// Cost-derived weights: `|a.cost - b.cost| + 1`
#[derive(Debug, Clone, Copy, Default)]
pub struct CostDifference;

impl CostModel for CostDifference {
    fn edge_cost(&mut self, a: &Task, b: &Task) -> f64 {
        (a.cost - b.cost).abs() + 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tasks_with_costs(costs: &[f64]) -> Vec<Task> {
        costs
            .iter()
            .enumerate()
            .map(|(i, &c)| Task::new(i as u32 + 1, 1, format!("task {i}"), c))
            .collect()
    }

    #[test]
    fn test_flow_network_layout() {
        let tasks = tasks_with_costs(&[10.0, 20.0]);
        let refs: Vec<&Task> = tasks.iter().collect();
        let network = build_flow_network(&refs).unwrap();

        assert_eq!(network.node_count(), 4);
        assert_eq!(network.source(), 0);
        assert_eq!(network.sink(), 3);
        assert_eq!(network.edges().len(), 8);

        let forward: Vec<_> = network.forward_edges().collect();
        assert_eq!((forward[0].from, forward[0].to, forward[0].capacity), (0, 1, 10.0));
        assert_eq!((forward[1].from, forward[1].to, forward[1].capacity), (1, 3, 10.0));
        assert_eq!((forward[2].from, forward[2].to, forward[2].capacity), (0, 2, 20.0));

        for (i, edge) in network.edges().iter().enumerate() {
            if i % 2 == 1 {
                assert_eq!(edge.capacity, 0.0);
                assert_eq!(edge.from, network.edge(i - 1).to);
            }
        }
    }

    #[test]
    fn test_flow_network_empty() {
        let network = build_flow_network(&[]).unwrap();
        assert_eq!(network.node_count(), 2);
        assert_eq!(network.sink(), 1);
        assert!(network.edges().is_empty());
    }

    #[test]
    fn test_flow_network_rejects_negative_cost() {
        let tasks = tasks_with_costs(&[5.0, -1.0]);
        let refs: Vec<&Task> = tasks.iter().collect();
        let result = build_flow_network(&refs);
        assert!(matches!(result, Err(AnalysisError::InvalidInput { .. })));
    }

    #[test]
    fn test_cost_table_rejects_asymmetry() {
        let result = CostTable::from_matrix(vec![vec![0.0, 1.0], vec![2.0, 0.0]]);
        assert!(result.is_err());

        let result = CostTable::from_matrix(vec![vec![0.0, 1.0]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cost_table_rejects_ragged_rows() {
        let result = CostTable::from_matrix(vec![
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![],
        ]);
        assert!(matches!(result, Err(AnalysisError::InvalidInput { .. })));

        let result = CostTable::from_matrix(vec![vec![0.0], vec![0.0, 1.0]]);
        assert!(matches!(result, Err(AnalysisError::InvalidInput { .. })));
    }

    #[test]
    fn test_cost_table_rejects_infinite_costs() {
        let inf = f64::INFINITY;
        let result = CostTable::from_matrix(vec![
            vec![0.0, inf, inf],
            vec![inf, 0.0, inf],
            vec![inf, inf, 0.0],
        ]);
        assert!(matches!(result, Err(AnalysisError::InvalidInput { .. })));

        let result = CostTable::from_matrix(vec![vec![0.0, -inf], vec![-inf, 0.0]]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flow_network_rejects_terminals_outside_graph() {
        assert!(matches!(
            FlowNetwork::new(2, 0, 5),
            Err(AnalysisError::InvalidInput { .. })
        ));
        assert!(FlowNetwork::new(2, 3, 1).is_err());
        assert!(FlowNetwork::new(0, 0, 0).is_err());

        let network = FlowNetwork::new(2, 0, 1).unwrap();
        assert_eq!((network.source(), network.sink()), (0, 1));
    }

    #[test]
    fn test_seeded_random_costs_are_reproducible() {
        let tasks = tasks_with_costs(&[1.0, 2.0, 3.0, 4.0]);
        let refs: Vec<&Task> = tasks.iter().collect();

        let first = RandomCosts::seeded(42).cost_table(&refs);
        let second = RandomCosts::seeded(42).cost_table(&refs);
        assert_eq!(first, second);

        for i in 0..4 {
            assert_eq!(first.cost(i, i), 0.0);
            for j in 0..4 {
                assert_eq!(first.cost(i, j), first.cost(j, i));
                if i != j {
                    assert!(RANDOM_COST_RANGE.contains(&first.cost(i, j)));
                }
            }
        }
    }

    #[test]
    fn test_cost_difference_model() {
        let tasks = tasks_with_costs(&[2.0, 7.5]);
        let refs: Vec<&Task> = tasks.iter().collect();
        let table = CostDifference.cost_table(&refs);
        assert_eq!(table.cost(0, 1), 6.5);
        assert_eq!(table.cost(1, 0), 6.5);
    }
}
