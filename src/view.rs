//! Derived views over the canonical task list.
//!
//! Pure functions only: every function reads its inputs and returns a fresh
//! sequence, never mutating anything it was given. Filters compose in a fixed
//! order (category, then status, then search); grouping is applied to an
//! already-sorted sequence.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::{Error, Result};
use crate::task::{Priority, Task};

/// Status filter applied after the category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
    /// High priority, regardless of completion state.
    High,
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "active" => Ok(StatusFilter::Active),
            "completed" => Ok(StatusFilter::Completed),
            "high" => Ok(StatusFilter::High),
            other => Err(Error::InvalidArgument(format!(
                "unknown filter '{other}' (expected all, active, completed, or high)"
            ))),
        }
    }

    fn keeps(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !task.completed,
            StatusFilter::Completed => task.completed,
            StatusFilter::High => task.priority == Priority::High,
        }
    }
}

/// Sort key for the derived sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// User-defined manual sequence; the default.
    #[default]
    Order,
    Priority,
    DueDate,
    Title,
}

impl SortKey {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "order" => Ok(SortKey::Order),
            "priority" => Ok(SortKey::Priority),
            "due" | "duedate" | "due-date" => Ok(SortKey::DueDate),
            "title" => Ok(SortKey::Title),
            other => Err(Error::InvalidArgument(format!(
                "unknown sort key '{other}' (expected order, priority, due, or title)"
            ))),
        }
    }
}

/// Grouping applied after sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    Status,
    Priority,
    Category,
}

impl GroupKey {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "status" => Ok(GroupKey::Status),
            "priority" => Ok(GroupKey::Priority),
            "category" => Ok(GroupKey::Category),
            other => Err(Error::InvalidArgument(format!(
                "unknown group key '{other}' (expected status, priority, or category)"
            ))),
        }
    }
}

/// The active view parameters, owned by the dashboard and exposed to the
/// presentation layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewParams {
    pub search_query: String,
    pub status_filter: StatusFilter,
    pub active_category: Option<i64>,
    pub sort_key: SortKey,
}

/// One group of a grouped view, in first-encounter order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskGroup {
    pub label: String,
    pub tasks: Vec<Task>,
}

/// Summary counts over the category-filtered base set, independent of the
/// status and search filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub all: usize,
    pub active: usize,
    pub completed: usize,
    /// High priority and not yet completed.
    pub high: usize,
}

/// Apply the category, status, and search filters, in that order.
pub fn filter_tasks(tasks: &[Task], params: &ViewParams) -> Vec<Task> {
    let query = params.search_query.trim().to_lowercase();
    tasks
        .iter()
        .filter(|task| match params.active_category {
            Some(category_id) => task.category_id == Some(category_id),
            None => true,
        })
        .filter(|task| params.status_filter.keeps(task))
        .filter(|task| query.is_empty() || task.title.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Sort into a new sequence. Stable for every key: ties keep the incoming
/// relative order. Never touches the `order` field itself.
pub fn sort_tasks(tasks: &[Task], key: SortKey) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    match key {
        SortKey::Order => sorted.sort_by_key(|task| task.order),
        SortKey::Priority => {
            sorted.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
        }
        SortKey::DueDate => {
            // Tasks without a due date sort after all dated tasks, keeping
            // their relative order among themselves.
            sorted.sort_by(|a, b| match (a.due_date, b.due_date) {
                (Some(left), Some(right)) => left.cmp(&right),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });
        }
        SortKey::Title => {
            sorted.sort_by(|a, b| {
                a.title
                    .to_lowercase()
                    .cmp(&b.title.to_lowercase())
                    .then_with(|| a.title.cmp(&b.title))
            });
        }
    }
    sorted
}

/// Group an already-sorted sequence. Groups appear in first-encounter order;
/// within a group, the incoming order is preserved.
pub fn group_tasks(tasks: &[Task], categories: &[Category], key: GroupKey) -> Vec<TaskGroup> {
    let mut groups: Vec<TaskGroup> = Vec::new();
    for task in tasks {
        let label = match key {
            GroupKey::Status => {
                if task.completed {
                    "Completed".to_string()
                } else {
                    "Active".to_string()
                }
            }
            GroupKey::Priority => task.priority.label().to_string(),
            GroupKey::Category => task
                .category_id
                .and_then(|id| categories.iter().find(|category| category.id == id))
                .map(|category| category.name.clone())
                .unwrap_or_else(|| "No Category".to_string()),
        };
        match groups.iter_mut().find(|group| group.label == label) {
            Some(group) => group.tasks.push(task.clone()),
            None => groups.push(TaskGroup {
                label,
                tasks: vec![task.clone()],
            }),
        }
    }
    groups
}

/// Counts over the category-filtered base set, before status and search
/// filtering.
pub fn count_tasks(tasks: &[Task], active_category: Option<i64>) -> TaskCounts {
    let base: Vec<&Task> = tasks
        .iter()
        .filter(|task| match active_category {
            Some(category_id) => task.category_id == Some(category_id),
            None => true,
        })
        .collect();

    TaskCounts {
        all: base.len(),
        active: base.iter().filter(|task| !task.completed).count(),
        completed: base.iter().filter(|task| task.completed).count(),
        high: base
            .iter()
            .filter(|task| task.priority == Priority::High && !task.completed)
            .count(),
    }
}

/// Fraction of tasks completed, for the progress summary. Zero when empty.
pub fn completion_ratio(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks.iter().filter(|task| task.completed).count();
    completed as f64 / tasks.len() as f64
}
