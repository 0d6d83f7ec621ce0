//! Shared fixtures for taskflow integration tests.

#![allow(dead_code)]

use chrono::{NaiveDate, TimeZone, Utc};
use taskflow::category::{Category, CategoryColor};
use taskflow::dashboard::Confirmation;
use taskflow::task::{Priority, Task};

/// Build a task with deterministic defaults; `order` mirrors the id so
/// fixtures sort predictably.
pub fn task(id: i64, title: &str) -> Task {
    Task {
        id,
        title: title.to_string(),
        completed: false,
        priority: Priority::Medium,
        category_id: None,
        due_date: None,
        created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        order: id,
    }
}

pub fn done(mut task: Task) -> Task {
    task.completed = true;
    task
}

pub fn with_priority(mut task: Task, priority: Priority) -> Task {
    task.priority = priority;
    task
}

pub fn with_category(mut task: Task, category_id: i64) -> Task {
    task.category_id = Some(category_id);
    task
}

pub fn with_due(mut task: Task, year: i32, month: u32, day: u32) -> Task {
    task.due_date = NaiveDate::from_ymd_opt(year, month, day);
    task
}

pub fn category(id: i64, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        color: CategoryColor::Blue,
        order: id,
    }
}

/// Confirmation that always declines, for short-circuit tests.
pub struct Decline;

impl Confirmation for Decline {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}
