use taskflow::category::{CategoryColor, CategoryDraft};
use taskflow::error::Error;
use taskflow::gateway::{CategoryGateway, TaskGateway};
use taskflow::store::FileStore;
use taskflow::task::{Priority, TaskDraft, TaskPatch};

#[tokio::test]
async fn empty_store_reads_as_empty_collections() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path());

    assert!(store.get_all().await.unwrap().is_empty());
    assert!(store.get_all_categories().await.unwrap().is_empty());
}

#[tokio::test]
async fn records_survive_reopening_the_store() {
    let dir = tempfile::tempdir().expect("tempdir");

    {
        let store = FileStore::new(dir.path());
        store.create(TaskDraft::new("Persist me")).await.unwrap();
        store
            .create_category(CategoryDraft::new("Work", CategoryColor::Indigo))
            .await
            .unwrap();
    }

    let reopened = FileStore::new(dir.path());
    let tasks = reopened.get_all().await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Persist me");

    let categories = reopened.get_all_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].color, CategoryColor::Indigo);
}

#[tokio::test]
async fn writes_leave_no_temp_files_behind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path());
    store.create(TaskDraft::new("a")).await.unwrap();
    store.create(TaskDraft::new("b")).await.unwrap();

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "tmp"))
        .collect();
    assert!(leftovers.is_empty());
    assert!(store.tasks_file().exists());
}

#[tokio::test]
async fn toggle_and_reorder_are_persisted() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path());
    let a = store.create(TaskDraft::new("a")).await.unwrap();
    let b = store.create(TaskDraft::new("b")).await.unwrap();

    store.toggle_complete(a.id).await.unwrap();
    store.reorder(&[b.id, a.id]).await.unwrap();

    let reopened = FileStore::new(dir.path());
    let tasks = reopened.get_all().await.unwrap();
    assert_eq!(tasks[0].id, b.id);
    assert_eq!(tasks[0].order, 0);
    assert_eq!(tasks[1].id, a.id);
    assert!(tasks[1].completed);
}

#[tokio::test]
async fn update_of_missing_task_fails_without_writing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path());

    let err = store
        .update(
            7,
            TaskPatch {
                title: Some("nope".to_string()),
                ..TaskPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
    assert!(!store.tasks_file().exists());
}

#[tokio::test]
async fn draft_priority_and_due_date_are_stored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path());

    let draft = TaskDraft {
        title: "Dated".to_string(),
        priority: Some(Priority::High),
        category_id: None,
        due_date: chrono::NaiveDate::from_ymd_opt(2026, 9, 1),
    };
    let created = store.create(draft).await.unwrap();

    let fetched = store.get_by_id(created.id).await.unwrap();
    assert_eq!(fetched.priority, Priority::High);
    assert_eq!(fetched.due_date, chrono::NaiveDate::from_ymd_opt(2026, 9, 1));
}
