use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for tasks, assigned monotonically by the store
pub type TaskId = u32;

/// Unique identifier for categories
pub type CategoryId = u32;

/// Unique identifier for users
pub type UserId = u32;

/// Lowest accepted task priority
pub const MIN_PRIORITY: u8 = 1;

/// Highest accepted task priority
pub const MAX_PRIORITY: u8 = 5;

/// A unit of work owned by exactly one user
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Option<u8>,
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub category: Option<CategoryId>,
    pub owner: UserId,
}

/// Task grouping label. Immutable once created.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Registered user. The password hash is produced by the caller.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
}

/// Plain collections as loaded by the shell
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Errors raised by the task store and the analysis engines
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("{operation} needs at least {required} items, got {actual}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: u32 },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl AnalysisError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn task_not_found(id: TaskId) -> Self {
        Self::NotFound { kind: "task", id }
    }

    pub fn user_not_found(id: UserId) -> Self {
        Self::NotFound { kind: "user", id }
    }

    pub fn category_not_found(id: CategoryId) -> Self {
        Self::NotFound {
            kind: "category",
            id,
        }
    }
}

impl Task {
    /// Create an uncategorized task without deadline or priority
    pub fn new(id: TaskId, owner: UserId, name: impl Into<String>, cost: f64) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            deadline: None,
            priority: None,
            cost,
            category: None,
            owner,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Check that the cost can act as a flow capacity
    pub fn validate_cost(&self) -> Result<(), AnalysisError> {
        validate_cost(self.cost).map_err(|_| {
            AnalysisError::invalid(format!(
                "task {} has invalid cost {}",
                self.id, self.cost
            ))
        })
    }
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl User {
    pub fn new(id: UserId, email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}

/// Reject negative, NaN and infinite costs
pub fn validate_cost(cost: f64) -> Result<(), AnalysisError> {
    if cost.is_finite() && cost >= 0.0 {
        Ok(())
    } else {
        Err(AnalysisError::invalid(format!(
            "cost must be a finite non-negative number, got {cost}"
        )))
    }
}

/// Reject priorities outside 1..=5
pub fn validate_priority(priority: u8) -> Result<(), AnalysisError> {
    if (MIN_PRIORITY..=MAX_PRIORITY).contains(&priority) {
        Ok(())
    } else {
        Err(AnalysisError::invalid(format!(
            "priority must be between {MIN_PRIORITY} and {MAX_PRIORITY}, got {priority}"
        )))
    }
}
