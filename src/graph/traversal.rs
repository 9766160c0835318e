//! Category-based task traversal.
//!
//! Two tasks are adjacent when they share a category. Adjacency is not
//! precomputed: every visited task scans the full task map, so a run costs
//! O(V·E) in the worst case. Owners are collected in discovery order.

use crate::task::types::{CategoryId, Task, TaskId, User, UserId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Frontier discipline for the traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Traversal {
    /// Queue based, first in first out
    Bfs,
    /// Stack based, last in first out
    Dfs,
}

/// How tasks without a category relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncategorizedPolicy {
    /// Uncategorized tasks form one shared group
    #[default]
    MatchEachOther,
    /// An uncategorized task is adjacent to nothing
    Isolated,
}

impl UncategorizedPolicy {
    fn matches(self, a: Option<CategoryId>, b: Option<CategoryId>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self == Self::MatchEachOther,
            _ => false,
        }
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bfs => "bfs",
            Self::Dfs => "dfs",
        })
    }
}

impl FromStr for Traversal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bfs" | "breadth-first" => Ok(Self::Bfs),
            "dfs" | "depth-first" => Ok(Self::Dfs),
            other => Err(format!("unknown traversal '{other}'")),
        }
    }
}

/// Frontier that behaves as a queue or a stack
struct Frontier {
    items: VecDeque<TaskId>,
    traversal: Traversal,
}

impl Frontier {
    fn new(traversal: Traversal) -> Self {
        Self {
            items: VecDeque::new(),
            traversal,
        }
    }

    fn push(&mut self, id: TaskId) {
        self.items.push_back(id);
    }

    fn pop(&mut self) -> Option<TaskId> {
        match self.traversal {
            Traversal::Bfs => self.items.pop_front(),
            Traversal::Dfs => self.items.pop_back(),
        }
    }
}

/// Owners of every task reachable from `start` through shared categories.
///
/// Returns an empty list when `start` is not in `tasks`. Owners absent
/// from `users` are skipped.
pub fn find_similar_users<'a>(
    tasks: &BTreeMap<TaskId, Task>,
    users: &'a BTreeMap<UserId, User>,
    start: TaskId,
    traversal: Traversal,
    policy: UncategorizedPolicy,
) -> Vec<&'a User> {
    let Some(start_task) = tasks.get(&start) else {
        debug!("Start task {} not found; nothing to traverse", start);
        return Vec::new();
    };
    let start_category = start_task.category;

    let mut owners: Vec<&User> = Vec::new();
    let mut visited: HashSet<TaskId> = HashSet::from([start]);
    let mut frontier = Frontier::new(traversal);
    frontier.push(start);

    while let Some(current) = frontier.pop() {
        let Some(task) = tasks.get(&current) else {
            continue;
        };

        match users.get(&task.owner) {
            Some(owner) if !owners.iter().any(|o| o.id == owner.id) => owners.push(owner),
            Some(_) => {}
            None => warn!("Task {} has unknown owner {}", task.id, task.owner),
        }

        for (&id, candidate) in tasks {
            if !visited.contains(&id) && policy.matches(candidate.category, start_category) {
                visited.insert(id);
                frontier.push(id);
            }
        }
    }

    debug!(
        "{} traversal from task {} visited {} tasks, found {} owners",
        traversal,
        start,
        visited.len(),
        owners.len()
    );
    owners
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users(count: u32) -> BTreeMap<UserId, User> {
        (1..=count)
            .map(|id| (id, User::new(id, format!("user{id}@example.com"), "hash")))
            .collect()
    }

    fn task(id: TaskId, owner: UserId, category: Option<u32>) -> (TaskId, Task) {
        let mut task = Task::new(id, owner, format!("task {id}"), 1.0);
        task.category = category;
        (id, task)
    }

    fn ids(found: &[&User]) -> Vec<UserId> {
        found.iter().map(|u| u.id).collect()
    }

    #[test]
    fn test_unknown_start_is_empty() {
        let tasks: BTreeMap<_, _> = [task(1, 1, Some(1))].into_iter().collect();
        let users = users(1);
        for traversal in [Traversal::Bfs, Traversal::Dfs] {
            let found = find_similar_users(&tasks, &users, 99, traversal, UncategorizedPolicy::default());
            assert!(found.is_empty());
        }
    }

    #[test]
    fn test_single_node_chain_returns_own_owner() {
        let tasks: BTreeMap<_, _> = [task(1, 1, Some(1)), task(2, 2, Some(2)), task(3, 3, Some(3))]
            .into_iter()
            .collect();
        let users = users(3);
        let found = find_similar_users(&tasks, &users, 2, Traversal::Bfs, UncategorizedPolicy::default());
        assert_eq!(ids(&found), vec![2]);
    }

    #[test]
    fn test_owners_are_distinct() {
        let tasks: BTreeMap<_, _> = [
            task(1, 1, Some(7)),
            task(2, 1, Some(7)),
            task(3, 2, Some(7)),
            task(4, 2, Some(7)),
            task(5, 3, Some(8)),
        ]
        .into_iter()
        .collect();
        let users = users(3);
        let found = find_similar_users(&tasks, &users, 1, Traversal::Bfs, UncategorizedPolicy::default());
        assert_eq!(ids(&found), vec![1, 2]);
    }

    #[test]
    fn test_bfs_and_dfs_discovery_order() {
        let tasks: BTreeMap<_, _> = [
            task(1, 1, Some(5)),
            task(2, 2, Some(5)),
            task(3, 3, Some(5)),
            task(4, 4, Some(5)),
        ]
        .into_iter()
        .collect();
        let users = users(4);

        let bfs = find_similar_users(&tasks, &users, 1, Traversal::Bfs, UncategorizedPolicy::default());
        assert_eq!(ids(&bfs), vec![1, 2, 3, 4]);

        // the stack pops the most recently discovered task first
        let dfs = find_similar_users(&tasks, &users, 1, Traversal::Dfs, UncategorizedPolicy::default());
        assert_eq!(ids(&dfs), vec![1, 4, 3, 2]);
    }

    #[test]
    fn test_uncategorized_policy() {
        let tasks: BTreeMap<_, _> = [task(1, 1, None), task(2, 2, None), task(3, 3, Some(1))]
            .into_iter()
            .collect();
        let users = users(3);

        let shared = find_similar_users(&tasks, &users, 1, Traversal::Bfs, UncategorizedPolicy::MatchEachOther);
        assert_eq!(ids(&shared), vec![1, 2]);

        let isolated = find_similar_users(&tasks, &users, 1, Traversal::Bfs, UncategorizedPolicy::Isolated);
        assert_eq!(ids(&isolated), vec![1]);
    }

    #[test]
    fn test_unknown_owner_is_skipped() {
        let tasks: BTreeMap<_, _> = [task(1, 1, Some(1)), task(2, 42, Some(1))].into_iter().collect();
        let users = users(1);
        let found = find_similar_users(&tasks, &users, 1, Traversal::Dfs, UncategorizedPolicy::default());
        assert_eq!(ids(&found), vec![1]);
    }

    #[test]
    fn test_traversal_names() {
        assert_eq!("BFS".parse::<Traversal>(), Ok(Traversal::Bfs));
        assert_eq!("depth-first".parse::<Traversal>(), Ok(Traversal::Dfs));
        assert!("random".parse::<Traversal>().is_err());
    }
}
