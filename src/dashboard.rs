//! Dashboard controller: the single owner of canonical application state.
//!
//! Holds the authoritative task and category lists for the session, drives
//! the load state machine, and applies the confirmed-success mutation
//! protocol: the gateway is called first, and local state changes only after
//! the gateway reports success. Gateway failures leave state untouched and
//! surface as a single error-level notice; they never crash the caller.

use tracing::{debug, warn};

use crate::category::{Category, CategoryDraft, CategoryPatch};
use crate::error::{Error, Result};
use crate::gateway::{CategoryGateway, TaskGateway};
use crate::notice::Notice;
use crate::task::{Task, TaskDraft, TaskPatch};
use crate::view::{
    self, GroupKey, SortKey, StatusFilter, TaskCounts, TaskGroup, ViewParams,
};

/// Load state machine. Mutations are accepted only in `Ready`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(String),
}

impl Phase {
    fn describe(&self) -> String {
        match self {
            Phase::Idle => "not loaded yet".to_string(),
            Phase::Loading => "load in progress".to_string(),
            Phase::Ready => "ready".to_string(),
            Phase::Error(message) => format!("load failed: {message}"),
        }
    }
}

/// Capability for destructive-action confirmations, supplied by the
/// presentation layer. Declining short-circuits the operation with no side
/// effect.
pub trait Confirmation {
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirmation that always answers yes (`--yes` flag, non-interactive use).
pub struct AutoConfirm;

impl Confirmation for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Result of a dashboard mutation.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub changed: bool,
    pub message: String,
}

impl ActionOutcome {
    fn changed(message: impl Into<String>) -> Self {
        Self {
            changed: true,
            message: message.into(),
        }
    }

    fn unchanged(message: impl Into<String>) -> Self {
        Self {
            changed: false,
            message: message.into(),
        }
    }
}

/// The dashboard controller, generic over the persistence gateway.
pub struct Dashboard<G> {
    gateway: G,
    confirmation: Box<dyn Confirmation>,
    phase: Phase,
    tasks: Vec<Task>,
    categories: Vec<Category>,
    params: ViewParams,
    notices: Vec<Notice>,
}

impl<G: TaskGateway + CategoryGateway> Dashboard<G> {
    pub fn new(gateway: G, confirmation: Box<dyn Confirmation>) -> Self {
        Self {
            gateway,
            confirmation,
            phase: Phase::Idle,
            tasks: Vec::new(),
            categories: Vec::new(),
            params: ViewParams::default(),
            notices: Vec::new(),
        }
    }

    // =========================================================================
    // Load state machine
    // =========================================================================

    /// Fetch both collections concurrently and transition to `Ready` once
    /// both succeed. Either failure transitions to `Error` with the message;
    /// calling `load` again retries from the `Error` state.
    pub async fn load(&mut self) -> Result<()> {
        self.phase = Phase::Loading;

        let (tasks, categories) =
            tokio::join!(self.gateway.get_all(), self.gateway.get_all_categories());

        match (tasks, categories) {
            (Ok(tasks), Ok(categories)) => {
                debug!(tasks = tasks.len(), categories = categories.len(), "loaded");
                self.tasks = tasks;
                self.categories = categories;
                self.phase = Phase::Ready;
                Ok(())
            }
            (Err(err), _) | (_, Err(err)) => {
                warn!(error = %err, "initial load failed");
                self.phase = Phase::Error(err.to_string());
                self.notices.push(Notice::error("Failed to load tasks"));
                Err(err)
            }
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Direct access to the underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.phase == Phase::Ready {
            Ok(())
        } else {
            Err(Error::NotReady(self.phase.describe()))
        }
    }

    /// Absorb a gateway failure: log it, surface one notice, leave state
    /// untouched.
    fn gateway_failed(&mut self, action: &str, err: &Error) -> ActionOutcome {
        warn!(error = %err, action, "gateway call failed");
        self.notices.push(Notice::error(format!("Failed to {action}")));
        ActionOutcome::unchanged(format!("Failed to {action}: {err}"))
    }

    // =========================================================================
    // Task mutations
    // =========================================================================

    pub async fn create_task(&mut self, draft: TaskDraft) -> Result<ActionOutcome> {
        self.ensure_ready()?;
        draft.validate()?;

        let created = self.gateway.create(draft).await;
        match created {
            Ok(task) => {
                self.tasks.push(task);
                self.notices.push(Notice::success("Task created"));
                Ok(ActionOutcome::changed("Task created"))
            }
            Err(err) => Ok(self.gateway_failed("create task", &err)),
        }
    }

    pub async fn update_task(&mut self, id: i64, patch: TaskPatch) -> Result<ActionOutcome> {
        self.ensure_ready()?;
        patch.validate()?;
        if patch.is_empty() {
            return Err(Error::InvalidArgument("no fields to update".to_string()));
        }

        let updated = self.gateway.update(id, patch).await;
        match updated {
            Ok(updated) => {
                self.replace_task(updated);
                self.notices.push(Notice::success("Task updated"));
                Ok(ActionOutcome::changed("Task updated"))
            }
            Err(err) => Ok(self.gateway_failed("update task", &err)),
        }
    }

    pub async fn toggle_complete(&mut self, id: i64) -> Result<ActionOutcome> {
        self.ensure_ready()?;

        let toggled = self.gateway.toggle_complete(id).await;
        match toggled {
            Ok(updated) => {
                let message = if updated.completed {
                    "Task completed"
                } else {
                    "Task marked active"
                };
                self.replace_task(updated);
                self.notices.push(Notice::success(message));
                Ok(ActionOutcome::changed(message))
            }
            Err(err) => Ok(self.gateway_failed("update task", &err)),
        }
    }

    pub async fn delete_task(&mut self, id: i64) -> Result<ActionOutcome> {
        self.ensure_ready()?;
        if !self
            .confirmation
            .confirm("Are you sure you want to delete this task?")
        {
            return Err(Error::ConfirmationDeclined);
        }

        let deleted = self.gateway.delete(id).await;
        match deleted {
            Ok(_) => {
                self.tasks.retain(|task| task.id != id);
                self.notices.push(Notice::success("Task deleted"));
                Ok(ActionOutcome::changed("Task deleted"))
            }
            Err(err) => Ok(self.gateway_failed("delete task", &err)),
        }
    }

    /// Persist a new manual sequence; the local list is replaced with the
    /// freshly renumbered list the gateway returns.
    pub async fn reorder_tasks(&mut self, ordered_ids: &[i64]) -> Result<ActionOutcome> {
        self.ensure_ready()?;

        let reordered = self.gateway.reorder(ordered_ids).await;
        match reordered {
            Ok(tasks) => {
                self.tasks = tasks;
                self.notices.push(Notice::success("Tasks reordered"));
                Ok(ActionOutcome::changed("Tasks reordered"))
            }
            Err(err) => Ok(self.gateway_failed("reorder tasks", &err)),
        }
    }

    // =========================================================================
    // Category mutations
    // =========================================================================

    pub async fn create_category(&mut self, draft: CategoryDraft) -> Result<ActionOutcome> {
        self.ensure_ready()?;
        draft.validate()?;

        let created = self.gateway.create_category(draft).await;
        match created {
            Ok(category) => {
                self.categories.push(category);
                self.notices.push(Notice::success("Category created"));
                Ok(ActionOutcome::changed("Category created"))
            }
            Err(err) => Ok(self.gateway_failed("create category", &err)),
        }
    }

    pub async fn update_category(
        &mut self,
        id: i64,
        patch: CategoryPatch,
    ) -> Result<ActionOutcome> {
        self.ensure_ready()?;
        patch.validate()?;
        if patch.is_empty() {
            return Err(Error::InvalidArgument("no fields to update".to_string()));
        }

        let updated = self.gateway.update_category(id, patch).await;
        match updated {
            Ok(updated) => {
                if let Some(slot) = self
                    .categories
                    .iter_mut()
                    .find(|category| category.id == updated.id)
                {
                    *slot = updated;
                }
                self.notices.push(Notice::success("Category updated"));
                Ok(ActionOutcome::changed("Category updated"))
            }
            Err(err) => Ok(self.gateway_failed("update category", &err)),
        }
    }

    /// Delete a category, detaching its tasks (`category_id` cleared) in the
    /// same state update that removes the category. A category still in use
    /// requires a confirmation naming the task count.
    pub async fn delete_category(&mut self, id: i64) -> Result<ActionOutcome> {
        self.ensure_ready()?;

        let referencing = self
            .tasks
            .iter()
            .filter(|task| task.category_id == Some(id))
            .count();
        if referencing > 0 {
            let prompt =
                format!("This category contains {referencing} task(s). Delete anyway?");
            if !self.confirmation.confirm(&prompt) {
                return Err(Error::ConfirmationDeclined);
            }
        }

        let deleted = self.gateway.delete_category(id).await;
        match deleted {
            Ok(_) => {
                self.categories.retain(|category| category.id != id);
                for task in &mut self.tasks {
                    if task.category_id == Some(id) {
                        task.category_id = None;
                    }
                }
                if self.params.active_category == Some(id) {
                    self.params.active_category = None;
                }
                self.notices.push(Notice::success("Category deleted"));
                Ok(ActionOutcome::changed("Category deleted"))
            }
            Err(err) => Ok(self.gateway_failed("delete category", &err)),
        }
    }

    // =========================================================================
    // Bulk operations (sequential per-item calls, failures reported once)
    // =========================================================================

    /// Toggle every currently-active task to completed, then reload the full
    /// list so partial failures cannot desynchronize local state.
    pub async fn mark_all_complete(&mut self) -> Result<ActionOutcome> {
        self.ensure_ready()?;

        let active_ids: Vec<i64> = self
            .tasks
            .iter()
            .filter(|task| !task.completed)
            .map(|task| task.id)
            .collect();
        if active_ids.is_empty() {
            self.notices
                .push(Notice::info("No active tasks to complete"));
            return Ok(ActionOutcome::unchanged("No active tasks to complete"));
        }

        let total = active_ids.len();
        let mut failures = 0usize;
        for id in active_ids {
            if let Err(err) = self.gateway.toggle_complete(id).await {
                warn!(error = %err, task_id = id, "bulk toggle failed");
                failures += 1;
            }
        }

        let reloaded = self.gateway.get_all().await;
        match reloaded {
            Ok(tasks) => self.tasks = tasks,
            Err(err) => return Ok(self.gateway_failed("reload tasks", &err)),
        }

        if failures == 0 {
            let message = format!("Marked {total} tasks as complete");
            self.notices.push(Notice::success(message.clone()));
            Ok(ActionOutcome::changed(message))
        } else {
            let message = format!("Failed to complete {failures} of {total} tasks");
            self.notices.push(Notice::error(message.clone()));
            Ok(ActionOutcome {
                changed: failures < total,
                message,
            })
        }
    }

    /// Delete every completed task after confirmation. Deletes are
    /// unambiguous, so local state is filtered by the successfully deleted
    /// ids instead of reloading.
    pub async fn clear_completed(&mut self) -> Result<ActionOutcome> {
        self.ensure_ready()?;

        let completed_ids: Vec<i64> = self
            .tasks
            .iter()
            .filter(|task| task.completed)
            .map(|task| task.id)
            .collect();
        if completed_ids.is_empty() {
            self.notices
                .push(Notice::info("No completed tasks to clear"));
            return Ok(ActionOutcome::unchanged("No completed tasks to clear"));
        }

        let total = completed_ids.len();
        let prompt = format!("Delete {total} completed tasks?");
        if !self.confirmation.confirm(&prompt) {
            return Err(Error::ConfirmationDeclined);
        }

        let mut deleted: Vec<i64> = Vec::with_capacity(total);
        for id in completed_ids {
            let result = self.gateway.delete(id).await;
            match result {
                Ok(_) => deleted.push(id),
                Err(err) => warn!(error = %err, task_id = id, "bulk delete failed"),
            }
        }

        self.tasks.retain(|task| !deleted.contains(&task.id));

        if deleted.len() == total {
            let message = format!("Cleared {total} completed tasks");
            self.notices.push(Notice::success(message.clone()));
            Ok(ActionOutcome::changed(message))
        } else {
            let failures = total - deleted.len();
            let message = format!("Failed to clear {failures} of {total} tasks");
            self.notices.push(Notice::error(message.clone()));
            Ok(ActionOutcome {
                changed: !deleted.is_empty(),
                message,
            })
        }
    }

    // =========================================================================
    // View parameters
    // =========================================================================

    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.params.search_query = query.into();
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.params.status_filter = filter;
    }

    pub fn set_active_category(&mut self, category: Option<i64>) {
        self.params.active_category = category;
    }

    pub fn set_sort_key(&mut self, key: SortKey) {
        self.params.sort_key = key;
    }

    // =========================================================================
    // Derived views (recomputed on demand, never cached)
    // =========================================================================

    /// The canonical task list, in load order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The filtered and sorted sequence the presentation layer renders.
    pub fn visible_tasks(&self) -> Vec<Task> {
        let filtered = view::filter_tasks(&self.tasks, &self.params);
        view::sort_tasks(&filtered, self.params.sort_key)
    }

    /// The visible sequence, grouped.
    pub fn grouped_tasks(&self, key: GroupKey) -> Vec<TaskGroup> {
        view::group_tasks(&self.visible_tasks(), &self.categories, key)
    }

    pub fn counts(&self) -> TaskCounts {
        view::count_tasks(&self.tasks, self.params.active_category)
    }

    pub fn completion_ratio(&self) -> f64 {
        view::completion_ratio(&self.tasks)
    }

    /// Drain accumulated notices for display.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn replace_task(&mut self, updated: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == updated.id) {
            *slot = updated;
        }
    }
}
