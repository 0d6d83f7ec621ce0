//! Persistence gateway contract.
//!
//! Every backend that can persist tasks and categories implements these two
//! traits. The dashboard is generic over them, so a remote service, a JSON
//! file store, or an in-memory mock are interchangeable. All operations are
//! async: they suspend the caller and complete in call order only when
//! awaited sequentially.

use crate::category::{Category, CategoryDraft, CategoryPatch};
use crate::error::Result;
use crate::task::{Priority, Task, TaskDraft, TaskPatch};

/// CRUD operations for the task resource.
///
/// Id assignment is the backend's job (max existing id + 1 for the local
/// backends). `create` assigns `order` as the collection length at creation
/// time, giving append-to-end semantics.
pub trait TaskGateway {
    /// Fetch every task. Fails with `Error::Fetch` if the backend is
    /// unreachable or reports failure.
    fn get_all(&self) -> impl std::future::Future<Output = Result<Vec<Task>>>;

    /// Fetch one task by id. Fails with `Error::NotFound` if absent.
    fn get_by_id(&self, id: i64) -> impl std::future::Future<Output = Result<Task>>;

    /// Create a task from a draft. Fails with `Error::Validation` when the
    /// title is missing or blank.
    fn create(&self, draft: TaskDraft) -> impl std::future::Future<Output = Result<Task>>;

    /// Merge the present fields of `patch` into the stored record, keeping
    /// the id. Fails with `Error::NotFound` if absent.
    fn update(&self, id: i64, patch: TaskPatch) -> impl std::future::Future<Output = Result<Task>>;

    /// Remove a task. No cascading effect. Fails with `Error::NotFound` if
    /// absent.
    fn delete(&self, id: i64) -> impl std::future::Future<Output = Result<bool>>;

    /// Read-then-write flip of the `completed` flag; returns the updated
    /// record.
    fn toggle_complete(&self, id: i64) -> impl std::future::Future<Output = Result<Task>>;

    /// Renumber tasks densely: the task at position `i` of `ordered_ids`
    /// gets `order = i`. Returns the full task list ascending by `order`.
    fn reorder(&self, ordered_ids: &[i64]) -> impl std::future::Future<Output = Result<Vec<Task>>>;

    /// Fetch the tasks referencing one category.
    fn get_by_category(&self, category_id: i64)
        -> impl std::future::Future<Output = Result<Vec<Task>>>;

    /// Fetch the tasks at one priority.
    fn get_by_priority(
        &self,
        priority: Priority,
    ) -> impl std::future::Future<Output = Result<Vec<Task>>>;
}

/// CRUD operations for the category resource.
///
/// Deleting a category has no cascading effect here; the dashboard owns the
/// cascade-detach of referencing tasks.
pub trait CategoryGateway {
    fn get_all_categories(&self) -> impl std::future::Future<Output = Result<Vec<Category>>>;

    fn get_category_by_id(&self, id: i64) -> impl std::future::Future<Output = Result<Category>>;

    /// Fails with `Error::Validation` when the name is missing or blank.
    fn create_category(
        &self,
        draft: CategoryDraft,
    ) -> impl std::future::Future<Output = Result<Category>>;

    fn update_category(
        &self,
        id: i64,
        patch: CategoryPatch,
    ) -> impl std::future::Future<Output = Result<Category>>;

    fn delete_category(&self, id: i64) -> impl std::future::Future<Output = Result<bool>>;
}
