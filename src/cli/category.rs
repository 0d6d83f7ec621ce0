//! taskflow category command implementations.

use serde::Serialize;

use crate::category::{Category, CategoryColor, CategoryDraft, CategoryPatch};
use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::notice::NoticeLevel;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::FileStore;

#[derive(Serialize)]
struct CategoryReport {
    changed: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
}

fn drain_into(dashboard: &mut Dashboard<FileStore>, human: &mut HumanOutput) {
    for notice in dashboard.drain_notices() {
        match notice.level {
            NoticeLevel::Error => human.push_warning(notice.message),
            NoticeLevel::Info | NoticeLevel::Success => human.push_detail(notice.message),
        }
    }
}

pub async fn run_add(
    dashboard: &mut Dashboard<FileStore>,
    name: String,
    color: String,
    output: OutputOptions,
) -> Result<()> {
    let draft = CategoryDraft::new(name, CategoryColor::parse(&color)?);
    let outcome = dashboard.create_category(draft).await?;
    let category = outcome
        .changed
        .then(|| dashboard.categories().last().cloned())
        .flatten();

    let mut human = HumanOutput::new(outcome.message.clone());
    if let Some(category) = &category {
        human.push_summary("category", format!("#{} {}", category.id, category.name));
        human.push_summary("color", category.color.name());
    }
    drain_into(dashboard, &mut human);

    let report = CategoryReport {
        changed: outcome.changed,
        message: outcome.message,
        category,
    };
    emit_success(output, "cat add", &report, Some(&human))
}

pub async fn run_list(
    dashboard: &mut Dashboard<FileStore>,
    output: OutputOptions,
) -> Result<()> {
    let mut categories = dashboard.categories().to_vec();
    categories.sort_by_key(|category| category.order);

    let mut human = HumanOutput::new(format!("{} categor(ies)", categories.len()));
    for category in &categories {
        let in_use = dashboard
            .tasks()
            .iter()
            .filter(|task| task.category_id == Some(category.id))
            .count();
        human.push_detail(format!(
            "#{} {} ({}, {} task(s))",
            category.id,
            category.name,
            category.color.name(),
            in_use
        ));
    }
    emit_success(output, "cat list", &categories, Some(&human))
}

pub async fn run_set(
    dashboard: &mut Dashboard<FileStore>,
    id: i64,
    name: Option<String>,
    color: Option<String>,
    output: OutputOptions,
) -> Result<()> {
    let patch = CategoryPatch {
        name,
        color: color.as_deref().map(CategoryColor::parse).transpose()?,
        order: None,
    };
    let outcome = dashboard.update_category(id, patch).await?;
    let category = dashboard
        .categories()
        .iter()
        .find(|category| category.id == id)
        .cloned();

    let mut human = HumanOutput::new(outcome.message.clone());
    if let Some(category) = &category {
        human.push_summary("category", format!("#{} {}", category.id, category.name));
        human.push_summary("color", category.color.name());
    }
    drain_into(dashboard, &mut human);

    let report = CategoryReport {
        changed: outcome.changed,
        message: outcome.message,
        category,
    };
    emit_success(output, "cat set", &report, Some(&human))
}

pub async fn run_rm(
    dashboard: &mut Dashboard<FileStore>,
    id: i64,
    output: OutputOptions,
) -> Result<()> {
    let outcome = dashboard.delete_category(id).await?;

    let mut human = HumanOutput::new(outcome.message.clone());
    drain_into(dashboard, &mut human);

    let report = CategoryReport {
        changed: outcome.changed,
        message: outcome.message,
        category: None,
    };
    emit_success(output, "cat rm", &report, Some(&human))
}
