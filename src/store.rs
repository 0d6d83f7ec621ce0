//! JSON-file persistence for taskflow.
//!
//! Stores canonical-schema records in two files under the store directory:
//!
//! ```text
//! <store dir>/
//!   tasks.json          # Vec<Task>
//!   categories.json     # Vec<Category>
//! ```
//!
//! Writes are atomic (temp file + rename) so readers never observe partial
//! files. Missing files read as empty collections.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};

use crate::category::{Category, CategoryDraft, CategoryPatch};
use crate::error::{Error, Result};
use crate::gateway::{CategoryGateway, TaskGateway};
use crate::task::{Priority, Task, TaskDraft, TaskPatch};

/// File name for the task collection
pub const TASKS_FILE: &str = "tasks.json";

/// File name for the category collection
pub const CATEGORIES_FILE: &str = "categories.json";

/// File-backed gateway rooted at a store directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.dir.join(TASKS_FILE)
    }

    pub fn categories_file(&self) -> PathBuf {
        self.dir.join(CATEGORIES_FILE)
    }

    // =========================================================================
    // File I/O helpers (atomic writes)
    // =========================================================================

    /// Read a JSON collection, treating a missing file as empty.
    fn read_collection<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)?;
        let records: Vec<T> = serde_json::from_str(&content)?;
        Ok(records)
    }

    /// Write JSON data atomically (write to temp, then rename).
    fn write_collection<T: Serialize>(&self, path: &Path, records: &[T]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(records)?;
        let temp_path = path.with_extension("tmp");

        let mut file = File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&temp_path, path)?;
        Ok(())
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        self.read_collection(&self.tasks_file())
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.write_collection(&self.tasks_file(), tasks)
    }

    fn read_categories(&self) -> Result<Vec<Category>> {
        self.read_collection(&self.categories_file())
    }

    fn write_categories(&self, categories: &[Category]) -> Result<()> {
        self.write_collection(&self.categories_file(), categories)
    }
}

fn next_id(existing: impl Iterator<Item = i64>) -> i64 {
    existing.max().unwrap_or(0) + 1
}

impl TaskGateway for FileStore {
    async fn get_all(&self) -> Result<Vec<Task>> {
        let mut tasks = self.read_tasks()?;
        tasks.sort_by_key(|task| task.order);
        Ok(tasks)
    }

    async fn get_by_id(&self, id: i64) -> Result<Task> {
        let tasks = self.read_tasks()?;
        tasks
            .into_iter()
            .find(|task| task.id == id)
            .ok_or_else(|| Error::task_not_found(id))
    }

    async fn create(&self, draft: TaskDraft) -> Result<Task> {
        draft.validate()?;
        let mut tasks = self.read_tasks()?;
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
        tasks.push(task.clone());
        self.write_tasks(&tasks)?;
        Ok(task)
    }

    async fn update(&self, id: i64, patch: TaskPatch) -> Result<Task> {
        patch.validate()?;
        let mut tasks = self.read_tasks()?;
        let record = tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| Error::task_not_found(id))?;
        patch.apply_to(record);
        let updated = record.clone();
        self.write_tasks(&tasks)?;
        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tasks = self.read_tasks()?;
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        if tasks.len() == before {
            return Err(Error::task_not_found(id));
        }
        self.write_tasks(&tasks)?;
        Ok(true)
    }

    async fn toggle_complete(&self, id: i64) -> Result<Task> {
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
        let mut tasks = self.read_tasks()?;
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
        self.write_tasks(&tasks)?;
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

impl CategoryGateway for FileStore {
    async fn get_all_categories(&self) -> Result<Vec<Category>> {
        self.read_categories()
    }

    async fn get_category_by_id(&self, id: i64) -> Result<Category> {
        let categories = self.read_categories()?;
        categories
            .into_iter()
            .find(|category| category.id == id)
            .ok_or_else(|| Error::category_not_found(id))
    }

    async fn create_category(&self, draft: CategoryDraft) -> Result<Category> {
        draft.validate()?;
        let mut categories = self.read_categories()?;
        let category = Category {
            id: next_id(categories.iter().map(|category| category.id)),
            name: draft.name.trim().to_string(),
            color: draft.color,
            order: categories.len() as i64,
        };
        categories.push(category.clone());
        self.write_categories(&categories)?;
        Ok(category)
    }

    async fn update_category(&self, id: i64, patch: CategoryPatch) -> Result<Category> {
        patch.validate()?;
        let mut categories = self.read_categories()?;
        let record = categories
            .iter_mut()
            .find(|category| category.id == id)
            .ok_or_else(|| Error::category_not_found(id))?;
        patch.apply_to(record);
        let updated = record.clone();
        self.write_categories(&categories)?;
        Ok(updated)
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        let mut categories = self.read_categories()?;
        let before = categories.len();
        categories.retain(|category| category.id != id);
        if categories.len() == before {
            return Err(Error::category_not_found(id));
        }
        self.write_categories(&categories)?;
        Ok(true)
    }
}
