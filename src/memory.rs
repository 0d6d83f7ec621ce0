//! In-memory gateway emulating the remote task service.
//!
//! The emulated backend speaks its own wire schema (`Id`, `title_c`,
//! `completed_c`, ...); records are held in that shape and translated to the
//! canonical schema at the boundary in both directions, exactly like a real
//! remote client would. Optional simulated latency and failure injection make
//! this the backend of choice for tests and demos.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::category::{Category, CategoryColor, CategoryDraft, CategoryPatch};
use crate::error::{Error, Result};
use crate::gateway::{CategoryGateway, TaskGateway};
use crate::task::{Priority, Task, TaskDraft, TaskPatch};

/// Task record in the emulated backend's wire schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireTask {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "title_c")]
    pub title: String,
    #[serde(rename = "completed_c")]
    pub completed: bool,
    #[serde(rename = "priority_c")]
    pub priority: String,
    #[serde(rename = "category_id_c", default)]
    pub category_id: Option<i64>,
    #[serde(rename = "due_date_c", default)]
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "created_at_c")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "order_c")]
    pub order: i64,
}

impl WireTask {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            title: task.title.clone(),
            completed: task.completed,
            priority: match task.priority {
                Priority::High => "high".to_string(),
                Priority::Medium => "medium".to_string(),
                Priority::Low => "low".to_string(),
            },
            category_id: task.category_id,
            due_date: task.due_date,
            created_at: task.created_at,
            order: task.order,
        }
    }

    fn to_task(&self) -> Task {
        Task {
            id: self.id,
            title: self.title.clone(),
            completed: self.completed,
            // Lenient: unknown priority strings from the backend collapse to
            // the default rather than failing the whole fetch.
            priority: Priority::parse(&self.priority).unwrap_or_default(),
            category_id: self.category_id,
            due_date: self.due_date,
            created_at: self.created_at,
            order: self.order,
        }
    }
}

/// Category record in the emulated backend's wire schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireCategory {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "color_c")]
    pub color: String,
    #[serde(rename = "order_c")]
    pub order: i64,
}

impl WireCategory {
    fn from_category(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            color: category.color.name().to_string(),
            order: category.order,
        }
    }

    fn to_category(&self) -> Category {
        Category {
            id: self.id,
            name: self.name.clone(),
            color: CategoryColor::parse(&self.color).unwrap_or_default(),
            order: self.order,
        }
    }
}

/// In-memory backend holding wire-format collections.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    tasks: Mutex<Vec<WireTask>>,
    categories: Mutex<Vec<WireCategory>>,
    latency: Duration,
    offline: AtomicBool,
    fail_next: Mutex<Option<String>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the backend with existing records, preserving their ids.
    pub fn with_seed(tasks: Vec<Task>, categories: Vec<Category>) -> Self {
        Self {
            tasks: Mutex::new(tasks.iter().map(WireTask::from_task).collect()),
            categories: Mutex::new(categories.iter().map(WireCategory::from_category).collect()),
            ..Self::default()
        }
    }

    /// Simulate network latency on every operation.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Make every subsequent operation fail, as if the backend were down.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make exactly the next operation fail with the given message.
    pub async fn inject_failure(&self, message: impl Into<String>) {
        *self.fail_next.lock().await = Some(message.into());
    }

    async fn simulate_call(&self) -> Result<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Fetch("backend unreachable".to_string()));
        }
        if let Some(message) = self.fail_next.lock().await.take() {
            return Err(Error::Fetch(message));
        }
        Ok(())
    }
}

fn next_id(existing: impl Iterator<Item = i64>) -> i64 {
    existing.max().unwrap_or(0) + 1
}

impl TaskGateway for MemoryGateway {
    async fn get_all(&self) -> Result<Vec<Task>> {
        self.simulate_call().await?;
        let tasks = self.tasks.lock().await;
        let mut out: Vec<Task> = tasks.iter().map(WireTask::to_task).collect();
        // The remote service returns tasks ordered by the order column.
        out.sort_by_key(|task| task.order);
        Ok(out)
    }

    async fn get_by_id(&self, id: i64) -> Result<Task> {
        self.simulate_call().await?;
        let tasks = self.tasks.lock().await;
        tasks
            .iter()
            .find(|task| task.id == id)
            .map(WireTask::to_task)
            .ok_or_else(|| Error::task_not_found(id))
    }

    async fn create(&self, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        self.simulate_call().await?;
        let mut tasks = self.tasks.lock().await;
        let task = Task {
            id: next_id(tasks.iter().map(|task| task.id)),
            title: draft.title.trim().to_string(),
            completed: false,
            priority: draft.priority.unwrap_or_default(),
            category_id: draft.category_id,
            due_date: draft.due_date,
            created_at: Utc::now(),
            order: tasks.len() as i64,
        };
        tasks.push(WireTask::from_task(&task));
        Ok(task)
    }

    async fn update(&self, id: i64, patch: TaskPatch) -> Result<Task> {
        patch.validate()?;
        self.simulate_call().await?;
        let mut tasks = self.tasks.lock().await;
        let record = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| Error::task_not_found(id))?;
        let mut task = record.to_task();
        patch.apply_to(&mut task);
        *record = WireTask::from_task(&task);
        Ok(task)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.simulate_call().await?;
        let mut tasks = self.tasks.lock().await;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        if tasks.len() == before {
            return Err(Error::task_not_found(id));
        }
        Ok(true)
    }

    async fn toggle_complete(&self, id: i64) -> Result<Task> {
        // Read-then-write, like the remote client: no atomicity assumed.
        let current = self.get_by_id(id).await?;
        self.update(
            id,
            TaskPatch {
                completed: Some(!current.completed),
                ..TaskPatch::default()
            },
        )
        .await
    }

    async fn reorder(&self, ordered_ids: &[i64]) -> Result<Vec<Task>> {
        self.simulate_call().await?;
        {
            let mut tasks = self.tasks.lock().await;
            for id in ordered_ids {
                if !tasks.iter().any(|task| task.id == *id) {
                    return Err(Error::task_not_found(*id));
                }
            }
            for (position, id) in ordered_ids.iter().enumerate() {
                if let Some(record) = tasks.iter_mut().find(|task| task.id == *id) {
                    record.order = position as i64;
                }
            }
        }
        self.get_all().await
    }

    async fn get_by_category(&self, category_id: i64) -> Result<Vec<Task>> {
        let all = self.get_all().await?;
        Ok(all
            .into_iter()
            .filter(|task| task.category_id == Some(category_id))
            .collect())
    }

    async fn get_by_priority(&self, priority: Priority) -> Result<Vec<Task>> {
        let all = self.get_all().await?;
        Ok(all
            .into_iter()
            .filter(|task| task.priority == priority)
            .collect())
    }
}

impl CategoryGateway for MemoryGateway {
    async fn get_all_categories(&self) -> Result<Vec<Category>> {
        self.simulate_call().await?;
        let categories = self.categories.lock().await;
        Ok(categories.iter().map(WireCategory::to_category).collect())
    }

    async fn get_category_by_id(&self, id: i64) -> Result<Category> {
        self.simulate_call().await?;
        let categories = self.categories.lock().await;
        categories
            .iter()
            .find(|category| category.id == id)
            .map(WireCategory::to_category)
            .ok_or_else(|| Error::category_not_found(id))
    }

    async fn create_category(&self, draft: CategoryDraft) -> Result<Category> {
        draft.validate()?;
        self.simulate_call().await?;
        let mut categories = self.categories.lock().await;
        let category = Category {
            id: next_id(categories.iter().map(|category| category.id)),
            name: draft.name.trim().to_string(),
            color: draft.color,
            order: categories.len() as i64,
        };
        categories.push(WireCategory::from_category(&category));
        Ok(category)
    }

    async fn update_category(&self, id: i64, patch: CategoryPatch) -> Result<Category> {
        patch.validate()?;
        self.simulate_call().await?;
        let mut categories = self.categories.lock().await;
        let record = categories
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or_else(|| Error::category_not_found(id))?;
        let mut category = record.to_category();
        patch.apply_to(&mut category);
        *record = WireCategory::from_category(&category);
        Ok(category)
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        self.simulate_call().await?;
        let mut categories = self.categories.lock().await;
        let before = categories.len();
        categories.retain(|category| category.id != id);
        if categories.len() == before {
            return Err(Error::category_not_found(id));
        }
        Ok(true)
    }
}
