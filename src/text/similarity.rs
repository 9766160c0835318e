//! Name similarity by longest common subsequence.
//!
//! The ratio divides the LCS length by the longer name's length, so it
//! lies in `[0, 1]` and identical names score 1.0.

use crate::task::types::Task;
use serde::Serialize;
use tracing::debug;

/// Ratio at or above which two task names count as similar
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.5;

/// Length of the longest common subsequence of `a` and `b`.
///
/// Compares Unicode scalar values with the classic O(|a|·|b|) table.
pub fn lcs_length(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            table[i][j] = if a[i - 1] == b[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }

    table[a.len()][b.len()]
}

/// LCS length over the longer string's length, in `[0, 1]`.
///
/// Two empty strings are identical and score 1.0.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    lcs_length(a, b) as f64 / longest as f64
}

/// Pair of tasks whose names are similar
#[derive(Debug, Clone, Serialize)]
pub struct SimilarTaskPair<'a> {
    pub first: &'a Task,
    pub second: &'a Task,
    pub ratio: f64,
}

/// Every unordered pair of `tasks`, in input order, whose name
/// similarity reaches `threshold`
pub fn similar_task_pairs<'a>(tasks: &[&'a Task], threshold: f64) -> Vec<SimilarTaskPair<'a>> {
    let mut pairs = Vec::new();

    for (i, &first) in tasks.iter().enumerate() {
        for &second in &tasks[i + 1..] {
            let ratio = similarity(&first.name, &second.name);
            if ratio >= threshold {
                pairs.push(SimilarTaskPair {
                    first,
                    second,
                    ratio,
                });
            }
        }
    }

    debug!(
        "{} of {} task pairs reach similarity {}",
        pairs.len(),
        tasks.len() * tasks.len().saturating_sub(1) / 2,
        threshold
    );
    pairs
}
