//! Minimum spanning tree via Prim's algorithm (dense graphs).
//!
//! Linear-scan selection, O(n²) over a complete cost table.

use crate::graph::builder::CostTable;
use crate::task::types::AnalysisError;
use serde::Serialize;
use tracing::debug;

/// Undirected tree edge `parent`–`child`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MstEdge {
    pub parent: usize,
    pub child: usize,
    pub weight: f64,
}

/// Parent links and connecting costs of a spanning tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MstResult {
    /// `parent[i]` is the tree predecessor of node `i`; `None` for the root
    pub parent: Vec<Option<usize>>,
    /// `key[i]` is the cost of the edge linking `i` to its parent
    pub key: Vec<f64>,
    pub root: usize,
}

impl MstResult {
    /// Edges as `(parent[i], i, key[i])` for every non-root node
    pub fn edges(&self) -> Vec<MstEdge> {
        self.parent
            .iter()
            .enumerate()
            .filter_map(|(child, parent)| {
                parent.map(|parent| MstEdge {
                    parent,
                    child,
                    weight: self.key[child],
                })
            })
            .collect()
    }

    pub fn total_weight(&self) -> f64 {
        self.edges().iter().map(|e| e.weight).sum()
    }
}

/// Prim's minimum spanning tree rooted at `root`.
///
/// Ties on the minimum key resolve to the lowest node index.
pub fn prim_mst(costs: &CostTable, root: usize) -> Result<MstResult, AnalysisError> {
    let n = costs.len();
    if n < 2 {
        return Err(AnalysisError::InsufficientData {
            operation: "minimum spanning tree",
            required: 2,
            actual: n,
        });
    }
    if root >= n {
        return Err(AnalysisError::invalid(format!(
            "root {root} outside graph of {n} nodes"
        )));
    }

    let mut key = vec![f64::INFINITY; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut in_tree = vec![false; n];
    key[root] = 0.0;

    for _ in 0..n {
        let mut selected: Option<usize> = None;
        for v in 0..n {
            if in_tree[v] {
                continue;
            }
            match selected {
                Some(u) if key[v] >= key[u] => {}
                _ => selected = Some(v),
            }
        }

        let Some(u) = selected else {
            break;
        };
        in_tree[u] = true;

        for v in 0..n {
            if v == u || in_tree[v] {
                continue;
            }
            let weight = costs.cost(u, v);
            if weight < key[v] {
                key[v] = weight;
                parent[v] = Some(u);
            }
        }
    }

    let result = MstResult { parent, key, root };
    debug!(
        "Prim MST over {} nodes from root {} weighs {:.3}",
        n,
        root,
        result.total_weight()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> CostTable {
        CostTable::from_matrix(vec![
            vec![0.0, 2.0, 0.0, 6.0, 0.0],
            vec![2.0, 0.0, 3.0, 8.0, 5.0],
            vec![0.0, 3.0, 0.0, 0.0, 7.0],
            vec![6.0, 8.0, 0.0, 0.0, 9.0],
            vec![0.0, 5.0, 7.0, 9.0, 0.0],
        ])
        .unwrap()
    }

    fn distinct_table() -> CostTable {
        CostTable::from_matrix(vec![
            vec![0.0, 4.0, 1.0, 7.0],
            vec![4.0, 0.0, 2.0, 5.0],
            vec![1.0, 2.0, 0.0, 3.0],
            vec![7.0, 5.0, 3.0, 0.0],
        ])
        .unwrap()
    }

    fn assert_spanning_tree(result: &MstResult) {
        let n = result.parent.len();
        assert_eq!(result.edges().len(), n - 1);
        assert_eq!(result.parent[result.root], None);

        // every node must reach the root without revisiting a node
        for start in 0..n {
            let mut seen = vec![false; n];
            let mut node = start;
            while let Some(p) = result.parent[node] {
                assert!(!seen[node], "cycle through node {node}");
                seen[node] = true;
                node = p;
            }
            assert_eq!(node, result.root);
        }
    }

    #[test]
    fn test_prim_distinct_weights() {
        let result = prim_mst(&distinct_table(), 0).unwrap();

        assert_spanning_tree(&result);
        assert_eq!(result.parent, vec![None, Some(2), Some(0), Some(2)]);
        assert_eq!(result.key, vec![0.0, 2.0, 1.0, 3.0]);
        assert_eq!(result.total_weight(), 6.0);
    }

    #[test]
    fn test_prim_total_weight_root_invariant() {
        let table = distinct_table();
        let expected = prim_mst(&table, 0).unwrap().total_weight();

        for root in 1..table.len() {
            let result = prim_mst(&table, root).unwrap();
            assert_spanning_tree(&result);
            assert_eq!(result.total_weight(), expected);
        }
    }

    #[test]
    fn test_prim_zero_cost_edges() {
        // zero entries are real zero-cost edges in a complete graph
        let result = prim_mst(&sample_table(), 0).unwrap();
        assert_spanning_tree(&result);
        assert_eq!(result.parent[1], Some(0));
        assert_eq!(result.total_weight(), 2.0);
    }

    #[test]
    fn test_prim_tie_break_prefers_lowest_index() {
        let table = CostTable::from_matrix(vec![
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ])
        .unwrap();
        let result = prim_mst(&table, 0).unwrap();

        assert_eq!(result.parent, vec![None, Some(0), Some(0)]);
    }

    #[test]
    fn test_prim_requires_two_nodes() {
        let result = prim_mst(&CostTable::zeroed(1), 0);
        assert_eq!(
            result,
            Err(AnalysisError::InsufficientData {
                operation: "minimum spanning tree",
                required: 2,
                actual: 1,
            })
        );
        assert!(prim_mst(&CostTable::zeroed(0), 0).is_err());
    }

    #[test]
    fn test_prim_rejects_out_of_range_root() {
        let result = prim_mst(&distinct_table(), 9);
        assert!(matches!(result, Err(AnalysisError::InvalidInput { .. })));
    }
}
