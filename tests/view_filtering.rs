mod support;

use support::{done, task, with_category, with_priority};
use taskflow::task::{Priority, Task};
use taskflow::view::{filter_tasks, StatusFilter, ViewParams};

fn sample() -> Vec<Task> {
    vec![
        task(1, "Buy Milk"),
        done(task(2, "Buy eggs")),
        with_priority(task(3, "File taxes"), Priority::High),
        done(with_priority(task(4, "Ship release"), Priority::High)),
        with_category(task(5, "Water plants"), 10),
    ]
}

fn params_with_filter(filter: StatusFilter) -> ViewParams {
    ViewParams {
        status_filter: filter,
        ..ViewParams::default()
    }
}

#[test]
fn active_and_completed_partition_the_collection() {
    let tasks = sample();
    let active = filter_tasks(&tasks, &params_with_filter(StatusFilter::Active));
    let completed = filter_tasks(&tasks, &params_with_filter(StatusFilter::Completed));

    assert_eq!(active.len() + completed.len(), tasks.len());
    for task in &tasks {
        let in_active = active.iter().any(|t| t.id == task.id);
        let in_completed = completed.iter().any(|t| t.id == task.id);
        assert!(in_active ^ in_completed, "task {} must be in exactly one side", task.id);
    }
}

#[test]
fn all_filter_is_identity() {
    let tasks = sample();
    let filtered = filter_tasks(&tasks, &ViewParams::default());
    assert_eq!(filtered, tasks);
}

#[test]
fn high_filter_keeps_completed_high_priority_tasks() {
    let tasks = sample();
    let high = filter_tasks(&tasks, &params_with_filter(StatusFilter::High));
    let ids: Vec<i64> = high.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![3, 4]);
}

#[test]
fn search_is_case_insensitive_substring() {
    let tasks = sample();
    let params = ViewParams {
        search_query: "milk".to_string(),
        ..ViewParams::default()
    };
    let found = filter_tasks(&tasks, &params);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Buy Milk");
}

#[test]
fn blank_search_is_a_no_op() {
    let tasks = sample();
    let params = ViewParams {
        search_query: "   ".to_string(),
        ..ViewParams::default()
    };
    assert_eq!(filter_tasks(&tasks, &params).len(), tasks.len());
}

#[test]
fn category_filter_applies_before_status_and_search() {
    let tasks = vec![
        with_category(task(1, "Buy milk"), 10),
        with_category(done(task(2, "Buy milk again")), 10),
        task(3, "Buy milk elsewhere"),
    ];
    let params = ViewParams {
        active_category: Some(10),
        status_filter: StatusFilter::Active,
        search_query: "MILK".to_string(),
        ..ViewParams::default()
    };
    let filtered = filter_tasks(&tasks, &params);
    let ids: Vec<i64> = filtered.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn no_active_category_keeps_uncategorized_and_categorized_tasks() {
    let tasks = sample();
    let params = ViewParams {
        active_category: None,
        ..ViewParams::default()
    };
    assert_eq!(filter_tasks(&tasks, &params).len(), tasks.len());
}

#[test]
fn filter_does_not_mutate_input() {
    let tasks = sample();
    let before = tasks.clone();
    let _ = filter_tasks(&tasks, &params_with_filter(StatusFilter::Completed));
    assert_eq!(tasks, before);
}
