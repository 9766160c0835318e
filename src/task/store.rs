use crate::task::types::*;
use chrono::{Days, NaiveDate};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is a valid regex")
});

/// In-memory owner of users, categories and tasks.
///
/// Every collection is keyed by a monotonically assigned id, so iteration
/// order equals creation order. The traversal and similarity engines rely
/// on that order being stable. A counter of `None` means its id space is
/// used up and further creation fails.
#[derive(Clone, Debug)]
pub struct TaskStore {
    users: BTreeMap<UserId, User>,
    categories: BTreeMap<CategoryId, Category>,
    tasks: BTreeMap<TaskId, Task>,
    next_user_id: Option<UserId>,
    next_category_id: Option<CategoryId>,
    next_task_id: Option<TaskId>,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            users: BTreeMap::new(),
            categories: BTreeMap::new(),
            tasks: BTreeMap::new(),
            next_user_id: Some(1),
            next_category_id: Some(1),
            next_task_id: Some(1),
        }
    }

    /// Build a store from already-deserialized collections.
    ///
    /// Ids are taken as given; duplicates, dangling owner/category
    /// references and invalid costs or priorities are rejected. Counters
    /// continue after the highest loaded id.
    pub fn from_dataset(dataset: Dataset) -> Result<Self, AnalysisError> {
        let mut store = Self::new();

        for user in dataset.users {
            if store.users.contains_key(&user.id) {
                return Err(AnalysisError::invalid(format!("duplicate user id {}", user.id)));
            }
            store.next_user_id = advance_past(store.next_user_id, user.id);
            store.users.insert(user.id, user);
        }

        for category in dataset.categories {
            if store.categories.contains_key(&category.id) {
                return Err(AnalysisError::invalid(format!(
                    "duplicate category id {}",
                    category.id
                )));
            }
            store.next_category_id = advance_past(store.next_category_id, category.id);
            store.categories.insert(category.id, category);
        }

        for task in dataset.tasks {
            if store.tasks.contains_key(&task.id) {
                return Err(AnalysisError::invalid(format!("duplicate task id {}", task.id)));
            }
            if !store.users.contains_key(&task.owner) {
                return Err(AnalysisError::user_not_found(task.owner));
            }
            if let Some(category) = task.category {
                if !store.categories.contains_key(&category) {
                    return Err(AnalysisError::category_not_found(category));
                }
            }
            if let Some(priority) = task.priority {
                validate_priority(priority)?;
            }
            task.validate_cost()?;
            store.next_task_id = advance_past(store.next_task_id, task.id);
            store.tasks.insert(task.id, task);
        }

        info!(
            "Loaded store with {} users, {} categories, {} tasks",
            store.users.len(),
            store.categories.len(),
            store.tasks.len()
        );
        Ok(store)
    }

    /// Snapshot the store as plain collections
    pub fn to_dataset(&self) -> Dataset {
        Dataset {
            users: self.users.values().cloned().collect(),
            categories: self.categories.values().cloned().collect(),
            tasks: self.tasks.values().cloned().collect(),
        }
    }

    /// Register a user with an already-hashed password
    pub fn register_user(
        &mut self,
        email: &str,
        password_hash: &str,
    ) -> Result<UserId, AnalysisError> {
        let email = email.trim();
        if !EMAIL_PATTERN.is_match(email) {
            return Err(AnalysisError::invalid(format!("'{email}' is not a valid email")));
        }
        if self.users.values().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(AnalysisError::invalid(format!("email '{email}' already registered")));
        }

        let id = allocate_id(&mut self.next_user_id, &self.users, "user")?;
        self.users.insert(id, User::new(id, email, password_hash));

        debug!("Registered user {} ({})", id, email);
        Ok(id)
    }

    /// Create a named category
    pub fn create_category(&mut self, name: &str) -> Result<CategoryId, AnalysisError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AnalysisError::invalid("category name must not be empty"));
        }

        let id = allocate_id(&mut self.next_category_id, &self.categories, "category")?;
        self.categories.insert(id, Category::new(id, name));

        debug!("Created category {} '{}'", id, name);
        Ok(id)
    }

    /// Create an uncategorized task for an existing owner
    pub fn create_task(
        &mut self,
        owner: UserId,
        name: &str,
        description: &str,
        cost: f64,
    ) -> Result<TaskId, AnalysisError> {
        if !self.users.contains_key(&owner) {
            return Err(AnalysisError::user_not_found(owner));
        }
        validate_cost(cost)?;

        let id = allocate_id(&mut self.next_task_id, &self.tasks, "task")?;
        let task = Task::new(id, owner, name, cost).with_description(description);
        self.tasks.insert(id, task);

        debug!("Created task {} '{}' for user {}", id, name, owner);
        Ok(id)
    }

    /// Attach a task to a category, replacing any previous one
    pub fn assign_category(
        &mut self,
        task_id: TaskId,
        category_id: CategoryId,
    ) -> Result<(), AnalysisError> {
        if !self.categories.contains_key(&category_id) {
            return Err(AnalysisError::category_not_found(category_id));
        }
        let task = self.get_task_mut(task_id)?;
        task.category = Some(category_id);

        debug!("Task {} categorized as {}", task_id, category_id);
        Ok(())
    }

    pub fn set_deadline(&mut self, task_id: TaskId, deadline: NaiveDate) -> Result<(), AnalysisError> {
        self.get_task_mut(task_id)?.deadline = Some(deadline);
        debug!("Task {} deadline set to {}", task_id, deadline);
        Ok(())
    }

    pub fn set_priority(&mut self, task_id: TaskId, priority: u8) -> Result<(), AnalysisError> {
        validate_priority(priority)?;
        self.get_task_mut(task_id)?.priority = Some(priority);
        debug!("Task {} priority set to {}", task_id, priority);
        Ok(())
    }

    /// Get a task by ID
    pub fn get_task(&self, task_id: TaskId) -> Result<&Task, AnalysisError> {
        self.tasks
            .get(&task_id)
            .ok_or_else(|| AnalysisError::task_not_found(task_id))
    }

    fn get_task_mut(&mut self, task_id: TaskId) -> Result<&mut Task, AnalysisError> {
        self.tasks
            .get_mut(&task_id)
            .ok_or_else(|| AnalysisError::task_not_found(task_id))
    }

    pub fn get_user(&self, user_id: UserId) -> Result<&User, AnalysisError> {
        self.users
            .get(&user_id)
            .ok_or_else(|| AnalysisError::user_not_found(user_id))
    }

    pub fn get_category(&self, category_id: CategoryId) -> Result<&Category, AnalysisError> {
        self.categories
            .get(&category_id)
            .ok_or_else(|| AnalysisError::category_not_found(category_id))
    }

    pub fn tasks(&self) -> &BTreeMap<TaskId, Task> {
        &self.tasks
    }

    pub fn users(&self) -> &BTreeMap<UserId, User> {
        &self.users
    }

    pub fn categories(&self) -> &BTreeMap<CategoryId, Category> {
        &self.categories
    }

    /// Tasks in creation order
    pub fn all_tasks(&self) -> Vec<&Task> {
        self.tasks.values().collect()
    }

    /// Tasks of one owner in creation order
    pub fn tasks_owned_by(&self, owner: UserId) -> Vec<&Task> {
        self.tasks.values().filter(|t| t.owner == owner).collect()
    }

    /// Tasks whose deadline falls within `[today, today + window_days]`,
    /// earliest first, higher priority first on equal dates.
    ///
    /// A window reaching past the last representable date is clamped to it.
    pub fn upcoming_reminders(&self, today: NaiveDate, window_days: u32) -> Vec<&Task> {
        let horizon = today
            .checked_add_days(Days::new(u64::from(window_days)))
            .unwrap_or(NaiveDate::MAX);
        let mut due: Vec<&Task> = self
            .tasks
            .values()
            .filter(|t| matches!(t.deadline, Some(d) if d >= today && d <= horizon))
            .collect();

        due.sort_by(|a, b| {
            a.deadline
                .cmp(&b.deadline)
                .then_with(|| b.priority.cmp(&a.priority))
                .then_with(|| a.id.cmp(&b.id))
        });

        if due.is_empty() {
            debug!("No deadlines between {} and {}", today, horizon);
        }
        due
    }

    /// Category names joined by single spaces, the Huffman coder's input
    pub fn category_text(&self) -> String {
        let names: Vec<&str> = self.categories.values().map(|c| c.name.as_str()).collect();
        if names.is_empty() {
            warn!("No categories available for category text");
        }
        names.join(" ")
    }
}

/// Counter value after loading `loaded`; `None` once `u32::MAX` is taken
fn advance_past(next: Option<u32>, loaded: u32) -> Option<u32> {
    match (next, loaded.checked_add(1)) {
        (Some(next), Some(after)) => Some(next.max(after)),
        _ => None,
    }
}

/// Take the next free id, refusing to reuse an occupied key
fn allocate_id<V>(
    next: &mut Option<u32>,
    taken: &BTreeMap<u32, V>,
    kind: &str,
) -> Result<u32, AnalysisError> {
    let id = next
        .filter(|id| !taken.contains_key(id))
        .ok_or_else(|| AnalysisError::invalid(format!("{kind} id space exhausted")))?;
    *next = id.checked_add(1);
    Ok(id)
}
