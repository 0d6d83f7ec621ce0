//! taskflow task command implementations.

use chrono::NaiveDate;
use serde::Serialize;

use crate::category::Category;
use crate::dashboard::{ActionOutcome, Dashboard};
use crate::error::{Error, Result};
use crate::notice::{Notice, NoticeLevel};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::FileStore;
use crate::task::{Priority, Task, TaskDraft, TaskPatch};
use crate::view::{GroupKey, SortKey, StatusFilter, TaskCounts};

/// Options for `taskflow list`
pub struct ListOptions {
    pub filter: Option<String>,
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub group: Option<String>,
    pub output: OutputOptions,
}

/// Options for `taskflow add`
pub struct AddOptions {
    pub title: String,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub due: Option<String>,
    pub output: OutputOptions,
}

/// Options for `taskflow edit`
pub struct EditOptions {
    pub id: i64,
    pub title: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub clear_category: bool,
    pub due: Option<String>,
    pub clear_due: bool,
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct MutationReport {
    changed: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<Task>,
}

/// Resolve a `--category` argument given as an id or a name.
pub fn resolve_category(dashboard: &Dashboard<FileStore>, raw: &str) -> Result<i64> {
    let trimmed = raw.trim();
    if let Ok(id) = trimmed.parse::<i64>() {
        if dashboard.categories().iter().any(|c| c.id == id) {
            return Ok(id);
        }
        return Err(Error::category_not_found(id));
    }
    dashboard
        .categories()
        .iter()
        .find(|c| c.name.eq_ignore_ascii_case(trimmed))
        .map(|c| c.id)
        .ok_or_else(|| Error::InvalidArgument(format!("no category named '{trimmed}'")))
}

fn parse_due(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidArgument(format!("invalid due date '{raw}' (expected YYYY-MM-DD)")))
}

fn format_task_line(task: &Task, categories: &[Category]) -> String {
    let check = if task.completed { "x" } else { " " };
    let mut line = format!("[{check}] #{} {}", task.id, task.title);
    if task.priority != Priority::Medium {
        line.push_str(&format!(" !{}", task.priority.label().to_lowercase()));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!(" due:{due}"));
    }
    if let Some(category) = task
        .category_id
        .and_then(|id| categories.iter().find(|c| c.id == id))
    {
        line.push_str(&format!(" @{}", category.name));
    }
    line
}

fn apply_notices(human: &mut HumanOutput, notices: Vec<Notice>) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Error => human.push_warning(notice.message),
            NoticeLevel::Info | NoticeLevel::Success => human.push_detail(notice.message),
        }
    }
}

fn emit_mutation(
    dashboard: &mut Dashboard<FileStore>,
    command: &str,
    outcome: ActionOutcome,
    task: Option<Task>,
    output: OutputOptions,
) -> Result<()> {
    let mut human = HumanOutput::new(outcome.message.clone());
    if let Some(task) = &task {
        human.push_summary("task", format_task_line(task, dashboard.categories()));
    }
    apply_notices(&mut human, dashboard.drain_notices());

    let report = MutationReport {
        changed: outcome.changed,
        message: outcome.message,
        task,
    };
    emit_success(output, command, &report, Some(&human))
}

pub async fn run_list(
    dashboard: &mut Dashboard<FileStore>,
    options: ListOptions,
) -> Result<()> {
    if let Some(filter) = options.filter.as_deref() {
        dashboard.set_status_filter(StatusFilter::parse(filter)?);
    }
    if let Some(sort) = options.sort.as_deref() {
        dashboard.set_sort_key(SortKey::parse(sort)?);
    }
    dashboard.set_search_query(options.search.unwrap_or_default());
    let category = options
        .category
        .as_deref()
        .map(|raw| resolve_category(dashboard, raw))
        .transpose()?;
    dashboard.set_active_category(category);

    let group = options
        .group
        .as_deref()
        .map(GroupKey::parse)
        .transpose()?;

    match group {
        Some(key) => {
            let groups = dashboard.grouped_tasks(key);
            let total: usize = groups.iter().map(|g| g.tasks.len()).sum();
            let mut human = HumanOutput::new(format!("{total} task(s)"));
            for group in &groups {
                human.push_detail(format!("{} ({})", group.label, group.tasks.len()));
                for task in &group.tasks {
                    human.push_detail(format!("  {}", format_task_line(task, dashboard.categories())));
                }
            }
            emit_success(options.output, "list", &groups, Some(&human))
        }
        None => {
            let tasks = dashboard.visible_tasks();
            let mut human = HumanOutput::new(format!("{} task(s)", tasks.len()));
            for task in &tasks {
                human.push_detail(format_task_line(task, dashboard.categories()));
            }
            emit_success(options.output, "list", &tasks, Some(&human))
        }
    }
}

pub async fn run_add(dashboard: &mut Dashboard<FileStore>, options: AddOptions) -> Result<()> {
    let draft = TaskDraft {
        title: options.title,
        priority: options.priority.as_deref().map(Priority::parse).transpose()?,
        category_id: options
            .category
            .as_deref()
            .map(|raw| resolve_category(dashboard, raw))
            .transpose()?,
        due_date: options.due.as_deref().map(parse_due).transpose()?,
    };

    let outcome = dashboard.create_task(draft).await?;
    let task = outcome
        .changed
        .then(|| dashboard.tasks().last().cloned())
        .flatten();
    emit_mutation(dashboard, "add", outcome, task, options.output)
}

pub async fn run_edit(dashboard: &mut Dashboard<FileStore>, options: EditOptions) -> Result<()> {
    let category_id = if options.clear_category {
        Some(None)
    } else {
        options
            .category
            .as_deref()
            .map(|raw| resolve_category(dashboard, raw).map(Some))
            .transpose()?
    };
    let due_date = if options.clear_due {
        Some(None)
    } else {
        options
            .due
            .as_deref()
            .map(|raw| parse_due(raw).map(Some))
            .transpose()?
    };

    let patch = TaskPatch {
        title: options.title,
        priority: options.priority.as_deref().map(Priority::parse).transpose()?,
        category_id,
        due_date,
        ..TaskPatch::default()
    };

    let outcome = dashboard.update_task(options.id, patch).await?;
    let task = outcome
        .changed
        .then(|| dashboard.tasks().iter().find(|t| t.id == options.id).cloned())
        .flatten();
    emit_mutation(dashboard, "edit", outcome, task, options.output)
}

pub async fn run_done(
    dashboard: &mut Dashboard<FileStore>,
    id: i64,
    output: OutputOptions,
) -> Result<()> {
    let outcome = dashboard.toggle_complete(id).await?;
    let task = outcome
        .changed
        .then(|| dashboard.tasks().iter().find(|t| t.id == id).cloned())
        .flatten();
    emit_mutation(dashboard, "done", outcome, task, output)
}

pub async fn run_rm(
    dashboard: &mut Dashboard<FileStore>,
    id: i64,
    output: OutputOptions,
) -> Result<()> {
    let outcome = dashboard.delete_task(id).await?;
    emit_mutation(dashboard, "rm", outcome, None, output)
}

pub async fn run_reorder(
    dashboard: &mut Dashboard<FileStore>,
    ids: &[i64],
    output: OutputOptions,
) -> Result<()> {
    let outcome = dashboard.reorder_tasks(ids).await?;

    let tasks = dashboard.visible_tasks();
    let mut human = HumanOutput::new(outcome.message.clone());
    for task in &tasks {
        human.push_detail(format_task_line(task, dashboard.categories()));
    }
    apply_notices(&mut human, dashboard.drain_notices());
    emit_success(output, "reorder", &tasks, Some(&human))
}

pub async fn run_complete_all(
    dashboard: &mut Dashboard<FileStore>,
    output: OutputOptions,
) -> Result<()> {
    let outcome = dashboard.mark_all_complete().await?;
    emit_mutation(dashboard, "complete-all", outcome, None, output)
}

pub async fn run_clear_completed(
    dashboard: &mut Dashboard<FileStore>,
    output: OutputOptions,
) -> Result<()> {
    let outcome = dashboard.clear_completed().await?;
    emit_mutation(dashboard, "clear-completed", outcome, None, output)
}

#[derive(Serialize)]
struct CountsReport {
    counts: TaskCounts,
    completion_ratio: f64,
}

pub async fn run_counts(
    dashboard: &mut Dashboard<FileStore>,
    category: Option<String>,
    output: OutputOptions,
) -> Result<()> {
    let category = category
        .as_deref()
        .map(|raw| resolve_category(dashboard, raw))
        .transpose()?;
    dashboard.set_active_category(category);

    let counts = dashboard.counts();
    let report = CountsReport {
        counts,
        completion_ratio: dashboard.completion_ratio(),
    };

    let mut human = HumanOutput::new("Task counts");
    human.push_summary("all", counts.all.to_string());
    human.push_summary("active", counts.active.to_string());
    human.push_summary("completed", counts.completed.to_string());
    human.push_summary("high priority", counts.high.to_string());
    human.push_summary(
        "progress",
        format!("{:.0}%", report.completion_ratio * 100.0),
    );
    emit_success(output, "counts", &report, Some(&human))
}
