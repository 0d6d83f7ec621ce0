mod support;

use support::{category, done, task, with_category, Decline};
use taskflow::category::{CategoryColor, CategoryDraft};
use taskflow::dashboard::{AutoConfirm, Dashboard, Phase};
use taskflow::error::Error;
use taskflow::memory::MemoryGateway;
use taskflow::notice::NoticeLevel;
use taskflow::task::{Task, TaskDraft, TaskPatch};
use taskflow::view::{SortKey, StatusFilter};

fn dashboard_with(
    tasks: Vec<Task>,
    categories: Vec<taskflow::category::Category>,
) -> Dashboard<MemoryGateway> {
    Dashboard::new(
        MemoryGateway::with_seed(tasks, categories),
        Box::new(AutoConfirm),
    )
}

async fn ready_dashboard(
    tasks: Vec<Task>,
    categories: Vec<taskflow::category::Category>,
) -> Dashboard<MemoryGateway> {
    let mut dashboard = dashboard_with(tasks, categories);
    dashboard.load().await.unwrap();
    dashboard
}

#[tokio::test]
async fn load_transitions_idle_to_ready() {
    let mut dashboard = dashboard_with(vec![task(1, "a")], vec![category(10, "Work")]);
    assert_eq!(*dashboard.phase(), Phase::Idle);

    dashboard.load().await.unwrap();
    assert_eq!(*dashboard.phase(), Phase::Ready);
    assert_eq!(dashboard.tasks().len(), 1);
    assert_eq!(dashboard.categories().len(), 1);
}

#[tokio::test]
async fn failed_load_enters_error_state_and_retry_recovers() {
    let gateway = MemoryGateway::with_seed(vec![task(1, "a")], vec![]);
    gateway.set_offline(true);
    let mut dashboard = Dashboard::new(gateway, Box::new(AutoConfirm));

    assert!(dashboard.load().await.is_err());
    assert!(matches!(dashboard.phase(), Phase::Error(_)));
    let notices = dashboard.drain_notices();
    assert!(notices.iter().any(|n| n.level == NoticeLevel::Error));

    dashboard.gateway().set_offline(false);
    dashboard.load().await.unwrap();
    assert_eq!(*dashboard.phase(), Phase::Ready);
}

#[tokio::test]
async fn mutations_are_rejected_before_ready() {
    let mut dashboard = dashboard_with(vec![], vec![]);
    let err = dashboard
        .create_task(TaskDraft::new("too early"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotReady(_)));
}

#[tokio::test]
async fn create_task_appends_after_confirmed_success() {
    let mut dashboard = ready_dashboard(vec![], vec![]).await;

    let outcome = dashboard.create_task(TaskDraft::new("Buy milk")).await.unwrap();
    assert!(outcome.changed);
    assert_eq!(dashboard.tasks().len(), 1);
    assert_eq!(dashboard.tasks()[0].title, "Buy milk");
}

#[tokio::test]
async fn validation_failure_never_reaches_the_gateway() {
    let mut dashboard = ready_dashboard(vec![], vec![]).await;
    // Even an offline backend is irrelevant: the draft is rejected first.
    dashboard.gateway().set_offline(true);

    let err = dashboard.create_task(TaskDraft::new("   ")).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(dashboard.tasks().is_empty());
}

#[tokio::test]
async fn gateway_failure_leaves_state_untouched() {
    let mut dashboard = ready_dashboard(vec![task(1, "keep me")], vec![]).await;
    dashboard.drain_notices();
    dashboard.gateway().inject_failure("boom").await;

    let outcome = dashboard
        .update_task(
            1,
            TaskPatch {
                title: Some("changed".to_string()),
                ..TaskPatch::default()
            },
        )
        .await
        .unwrap();

    assert!(!outcome.changed);
    assert_eq!(dashboard.tasks()[0].title, "keep me");
    let notices = dashboard.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
}

#[tokio::test]
async fn toggle_replaces_the_authoritative_copy() {
    let mut dashboard = ready_dashboard(vec![task(1, "flip")], vec![]).await;

    dashboard.toggle_complete(1).await.unwrap();
    assert!(dashboard.tasks()[0].completed);
    dashboard.toggle_complete(1).await.unwrap();
    assert!(!dashboard.tasks()[0].completed);
}

#[tokio::test]
async fn declined_delete_has_no_side_effect() {
    let gateway = MemoryGateway::with_seed(vec![task(1, "spared")], vec![]);
    let mut dashboard = Dashboard::new(gateway, Box::new(Decline));
    dashboard.load().await.unwrap();

    let err = dashboard.delete_task(1).await.unwrap_err();
    assert!(matches!(err, Error::ConfirmationDeclined));
    assert_eq!(err.exit_code(), 0);
    assert_eq!(dashboard.tasks().len(), 1);
}

#[tokio::test]
async fn reorder_replaces_local_list_with_renumbered_sequence() {
    let mut dashboard =
        ready_dashboard(vec![task(1, "a"), task(2, "b"), task(3, "c")], vec![]).await;

    dashboard.reorder_tasks(&[3, 1, 2]).await.unwrap();
    let ids: Vec<i64> = dashboard.tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![3, 1, 2]);

    dashboard.set_sort_key(SortKey::Order);
    let visible: Vec<i64> = dashboard.visible_tasks().iter().map(|t| t.id).collect();
    assert_eq!(visible, vec![3, 1, 2]);
}

#[tokio::test]
async fn deleting_category_detaches_tasks_in_one_update() {
    let mut dashboard = ready_dashboard(
        vec![
            with_category(task(1, "t1"), 10),
            with_category(task(2, "t2"), 10),
            task(3, "unrelated"),
        ],
        vec![category(10, "Doomed"), category(11, "Kept")],
    )
    .await;
    dashboard.set_active_category(Some(10));

    let outcome = dashboard.delete_category(10).await.unwrap();
    assert!(outcome.changed);

    assert!(dashboard.categories().iter().all(|c| c.id != 10));
    assert!(dashboard
        .tasks()
        .iter()
        .filter(|t| t.id != 3)
        .all(|t| t.category_id.is_none()));
    // The active-category filter no longer points at a dead id.
    assert_eq!(dashboard.params().active_category, None);
    // Detach, not delete: all three tasks remain.
    assert_eq!(dashboard.tasks().len(), 3);
}

#[tokio::test]
async fn deleting_referenced_category_respects_declined_confirmation() {
    let gateway = MemoryGateway::with_seed(
        vec![with_category(task(1, "t1"), 10)],
        vec![category(10, "Safe")],
    );
    let mut dashboard = Dashboard::new(gateway, Box::new(Decline));
    dashboard.load().await.unwrap();

    let err = dashboard.delete_category(10).await.unwrap_err();
    assert!(matches!(err, Error::ConfirmationDeclined));
    assert_eq!(dashboard.categories().len(), 1);
    assert_eq!(dashboard.tasks()[0].category_id, Some(10));
}

#[tokio::test]
async fn unreferenced_category_deletes_without_confirmation() {
    let gateway = MemoryGateway::with_seed(vec![], vec![category(10, "Empty")]);
    // Decline would abort if any confirmation were requested.
    let mut dashboard = Dashboard::new(gateway, Box::new(Decline));
    dashboard.load().await.unwrap();

    let outcome = dashboard.delete_category(10).await.unwrap();
    assert!(outcome.changed);
    assert!(dashboard.categories().is_empty());
}

#[tokio::test]
async fn mark_all_complete_reports_no_op_on_empty_active_set() {
    let mut dashboard = ready_dashboard(vec![done(task(1, "done"))], vec![]).await;
    dashboard.drain_notices();

    let outcome = dashboard.mark_all_complete().await.unwrap();
    assert!(!outcome.changed);
    let notices = dashboard.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Info);
}

#[tokio::test]
async fn mark_all_complete_toggles_every_active_task_and_reloads() {
    let mut dashboard =
        ready_dashboard(vec![task(1, "a"), done(task(2, "b")), task(3, "c")], vec![]).await;

    let outcome = dashboard.mark_all_complete().await.unwrap();
    assert!(outcome.changed);
    assert!(dashboard.tasks().iter().all(|t| t.completed));
    assert_eq!(outcome.message, "Marked 2 tasks as complete");
}

#[tokio::test]
async fn mark_all_complete_reports_accumulated_failures_once() {
    let mut dashboard = ready_dashboard(vec![task(1, "a"), task(2, "b")], vec![]).await;
    dashboard.drain_notices();
    dashboard.gateway().inject_failure("boom").await;

    let outcome = dashboard.mark_all_complete().await.unwrap();
    assert!(outcome.changed);
    assert_eq!(outcome.message, "Failed to complete 1 of 2 tasks");

    let notices = dashboard.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);

    // The reload converges local state to backend truth: only the task whose
    // toggle went through is completed.
    let completed: Vec<i64> = dashboard
        .tasks()
        .iter()
        .filter(|t| t.completed)
        .map(|t| t.id)
        .collect();
    assert_eq!(completed, vec![2]);
}

#[tokio::test]
async fn clear_completed_drops_deleted_entries_by_predicate() {
    let mut dashboard = ready_dashboard(
        vec![done(task(1, "gone")), task(2, "stays"), done(task(3, "gone too"))],
        vec![],
    )
    .await;

    let outcome = dashboard.clear_completed().await.unwrap();
    assert!(outcome.changed);
    let ids: Vec<i64> = dashboard.tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2]);
    assert_eq!(outcome.message, "Cleared 2 completed tasks");
}

#[tokio::test]
async fn clear_completed_keeps_entries_whose_delete_failed() {
    let mut dashboard =
        ready_dashboard(vec![done(task(1, "stuck")), done(task(2, "gone"))], vec![]).await;
    dashboard.drain_notices();
    dashboard.gateway().inject_failure("boom").await;

    let outcome = dashboard.clear_completed().await.unwrap();
    assert!(outcome.changed);
    assert_eq!(outcome.message, "Failed to clear 1 of 2 tasks");

    let notices = dashboard.drain_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);

    // The failed delete still exists on the backend, so it stays local too.
    let ids: Vec<i64> = dashboard.tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1]);
}

#[tokio::test]
async fn clear_completed_requires_confirmation() {
    let gateway = MemoryGateway::with_seed(vec![done(task(1, "kept"))], vec![]);
    let mut dashboard = Dashboard::new(gateway, Box::new(Decline));
    dashboard.load().await.unwrap();

    let err = dashboard.clear_completed().await.unwrap_err();
    assert!(matches!(err, Error::ConfirmationDeclined));
    assert_eq!(dashboard.tasks().len(), 1);
}

#[tokio::test]
async fn visible_tasks_recompute_from_current_parameters() {
    let mut dashboard = ready_dashboard(
        vec![
            with_category(task(1, "Buy milk"), 10),
            with_category(done(task(2, "Buy eggs")), 10),
            task(3, "Walk dog"),
        ],
        vec![category(10, "Errands")],
    )
    .await;

    dashboard.set_active_category(Some(10));
    dashboard.set_status_filter(StatusFilter::Active);
    dashboard.set_search_query("buy");
    let ids: Vec<i64> = dashboard.visible_tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1]);

    dashboard.set_search_query("");
    dashboard.set_status_filter(StatusFilter::All);
    let ids: Vec<i64> = dashboard.visible_tasks().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2]);

    let counts = dashboard.counts();
    assert_eq!(counts.all, 2);
    assert_eq!(counts.active, 1);
}

#[tokio::test]
async fn create_category_appends_and_notifies() {
    let mut dashboard = ready_dashboard(vec![], vec![]).await;
    dashboard.drain_notices();

    let outcome = dashboard
        .create_category(CategoryDraft::new("Work", CategoryColor::Purple))
        .await
        .unwrap();
    assert!(outcome.changed);
    assert_eq!(dashboard.categories().len(), 1);
    let notices = dashboard.drain_notices();
    assert_eq!(notices[0].level, NoticeLevel::Success);
}
