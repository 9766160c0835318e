//! Maximum flow over a residual [`FlowNetwork`].
//!
//! Ford-Fulkerson and Edmonds-Karp share one BFS augmenting-path routine:
//! with breadth-first path discovery Ford-Fulkerson *is* Edmonds-Karp. Both
//! entry points are kept because callers select the algorithm by name.
//! Dinic's algorithm alternates level-graph construction with blocking
//! flows.

use crate::graph::builder::FlowNetwork;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Residual capacity at or below this is treated as saturated
pub const FLOW_EPSILON: f64 = 1e-9;

/// Selectable max-flow algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowAlgorithm {
    FordFulkerson,
    EdmondsKarp,
    Dinic,
}

impl FlowAlgorithm {
    pub const ALL: [FlowAlgorithm; 3] = [Self::FordFulkerson, Self::EdmondsKarp, Self::Dinic];

    /// Run this algorithm on `network`, returning the flow it adds
    pub fn run(self, network: &mut FlowNetwork) -> f64 {
        match self {
            Self::FordFulkerson => ford_fulkerson(network),
            Self::EdmondsKarp => edmonds_karp(network),
            Self::Dinic => dinic(network),
        }
    }
}

impl fmt::Display for FlowAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FordFulkerson => "ford-fulkerson",
            Self::EdmondsKarp => "edmonds-karp",
            Self::Dinic => "dinic",
        };
        f.write_str(name)
    }
}

impl FromStr for FlowAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "ford-fulkerson" | "ff" => Ok(Self::FordFulkerson),
            "edmonds-karp" | "ek" => Ok(Self::EdmondsKarp),
            "dinic" | "dinics" => Ok(Self::Dinic),
            other => Err(format!("unknown flow algorithm '{other}'")),
        }
    }
}

/// Ford-Fulkerson with BFS path discovery
pub fn ford_fulkerson(network: &mut FlowNetwork) -> f64 {
    let total = augment_along_shortest_paths(network);
    debug!("Ford-Fulkerson max flow: {}", total);
    total
}

/// Edmonds-Karp: augment along shortest residual paths
pub fn edmonds_karp(network: &mut FlowNetwork) -> f64 {
    let total = augment_along_shortest_paths(network);
    debug!("Edmonds-Karp max flow: {}", total);
    total
}

fn augment_along_shortest_paths(network: &mut FlowNetwork) -> f64 {
    let source = network.source();
    let sink = network.sink();
    let mut total = 0.0;
    let mut augmentations = 0usize;

    if source == sink {
        return total;
    }

    while let Some(path) = find_augmenting_path(network) {
        let bottleneck = path
            .iter()
            .map(|&e| network.edge(e).residual())
            .fold(f64::INFINITY, f64::min);

        for &e in &path {
            network.push(e, bottleneck);
        }
        total += bottleneck;
        augmentations += 1;
    }

    debug!("{} augmenting paths found", augmentations);
    total
}

/// BFS over residual edges; returns edge indices from source to sink
fn find_augmenting_path(network: &FlowNetwork) -> Option<Vec<usize>> {
    let source = network.source();
    let sink = network.sink();
    let mut via_edge: Vec<Option<usize>> = vec![None; network.node_count()];
    let mut visited = vec![false; network.node_count()];
    let mut queue = VecDeque::new();

    visited[source] = true;
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        if u == sink {
            break;
        }
        for &e in network.outgoing(u) {
            let edge = network.edge(e);
            if !visited[edge.to] && edge.residual() > FLOW_EPSILON {
                visited[edge.to] = true;
                via_edge[edge.to] = Some(e);
                queue.push_back(edge.to);
            }
        }
    }

    if !visited[sink] {
        return None;
    }

    let mut path = Vec::new();
    let mut node = sink;
    while node != source {
        let e = via_edge[node]?;
        path.push(e);
        node = network.edge(e).from;
    }
    path.reverse();
    Some(path)
}

/// Dinic's algorithm
pub fn dinic(network: &mut FlowNetwork) -> f64 {
    let source = network.source();
    let sink = network.sink();
    let mut total = 0.0;
    let mut phases = 0usize;

    if source == sink {
        return total;
    }

    while let Some(level) = build_levels(network) {
        let mut next_edge = vec![0usize; network.node_count()];
        loop {
            let pushed = send_blocking_flow(network, &level, &mut next_edge, source, f64::INFINITY);
            if pushed <= FLOW_EPSILON {
                break;
            }
            total += pushed;
        }
        phases += 1;
    }

    debug!("Dinic max flow: {} after {} phases", total, phases);
    total
}

/// BFS hop distances from the source; `None` if the sink is unreachable
fn build_levels(network: &FlowNetwork) -> Option<Vec<Option<usize>>> {
    let source = network.source();
    let mut level: Vec<Option<usize>> = vec![None; network.node_count()];
    let mut queue = VecDeque::new();

    level[source] = Some(0);
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        let next = level[u].map(|l| l + 1);
        for &e in network.outgoing(u) {
            let edge = network.edge(e);
            if level[edge.to].is_none() && edge.residual() > FLOW_EPSILON {
                level[edge.to] = next;
                queue.push_back(edge.to);
            }
        }
    }

    level[network.sink()].map(|_| level)
}

/// DFS along level-advancing edges; `next_edge` skips exhausted edges
fn send_blocking_flow(
    network: &mut FlowNetwork,
    level: &[Option<usize>],
    next_edge: &mut [usize],
    node: usize,
    limit: f64,
) -> f64 {
    if node == network.sink() {
        return limit;
    }

    while next_edge[node] < network.outgoing(node).len() {
        let e = network.outgoing(node)[next_edge[node]];
        let edge = network.edge(e);
        let (to, residual) = (edge.to, edge.residual());

        let advances = match (level[node], level[to]) {
            (Some(from_level), Some(to_level)) => to_level == from_level + 1,
            _ => false,
        };

        if advances && residual > FLOW_EPSILON {
            let pushed = send_blocking_flow(network, level, next_edge, to, limit.min(residual));
            if pushed > FLOW_EPSILON {
                network.push(e, pushed);
                return pushed;
            }
        }
        next_edge[node] += 1;
    }

    0.0
}
