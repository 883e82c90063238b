mod common;

use common::{prefs, shared_memory_db};
use nextstep_core::repo::prefs_repo::SharedConnection;
use nextstep_core::store::task_store::{default_tasks, TASKS_KEY, TASKS_NAMESPACE};
use nextstep_core::{EncryptedPrefs, KeyValueStore, Task, TaskCategory, TaskPriority, TaskStore};
use std::sync::{Arc, Mutex};

fn open_store(conn: &SharedConnection) -> TaskStore<EncryptedPrefs> {
    TaskStore::open(prefs(conn, TASKS_NAMESPACE)).unwrap()
}

fn stored_blob(conn: &SharedConnection) -> Option<String> {
    prefs(conn, TASKS_NAMESPACE).get_string(TASKS_KEY).unwrap()
}

#[test]
fn first_open_seeds_and_persists_default_tasks() {
    let conn = shared_memory_db();
    let store = open_store(&conn);

    let ids: Vec<_> = store.tasks().iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);
    assert_eq!(store.tasks()[0].category, TaskCategory::Health);
    assert_eq!(store.tasks()[1].category, TaskCategory::Learning);
    assert_eq!(store.tasks()[2].category, TaskCategory::Personal);
    assert!(store
        .tasks()
        .iter()
        .all(|task| task.priority == TaskPriority::Medium && !task.is_completed));

    let persisted: Vec<Task> = serde_json::from_str(&stored_blob(&conn).unwrap()).unwrap();
    assert_eq!(persisted, store.tasks());
}

#[test]
fn persisted_list_survives_reload() {
    let conn = shared_memory_db();
    let mut store = open_store(&conn);
    store
        .add(
            Task::new("a", "Call mentor", "Weekly check-in")
                .with_category(TaskCategory::Work)
                .with_priority(TaskPriority::High)
                .with_window(1_700_000_000_000, 1_700_003_600_000),
        )
        .unwrap();
    store.complete("2").unwrap();
    store.start("3").unwrap();
    let before = store.tasks().to_vec();
    drop(store);

    let reloaded = open_store(&conn);
    assert_eq!(reloaded.tasks(), before.as_slice());
}

#[test]
fn corrupted_blob_is_replaced_by_defaults() {
    let conn = shared_memory_db();
    prefs(&conn, TASKS_NAMESPACE)
        .put_string(TASKS_KEY, "{not valid json")
        .unwrap();

    let store = open_store(&conn);
    let ids: Vec<_> = store.tasks().iter().map(|task| task.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "3"]);

    let persisted: Vec<Task> = serde_json::from_str(&stored_blob(&conn).unwrap()).unwrap();
    assert_eq!(persisted, store.tasks());
}

#[test]
fn missing_required_field_falls_back_to_defaults() {
    let conn = shared_memory_db();
    prefs(&conn, TASKS_NAMESPACE)
        .put_string(TASKS_KEY, r#"[{"id":"x","title":"only a title"}]"#)
        .unwrap();

    let store = open_store(&conn);
    assert_eq!(store.tasks().len(), 3);
    assert!(store.get("x").is_none());
}

#[test]
fn unknown_fields_are_ignored_on_load() {
    let conn = shared_memory_db();
    let blob = r#"[{
        "id": "z",
        "title": "Walk",
        "description": "Around the block",
        "isCompleted": false,
        "inProgress": true,
        "startDate": 10,
        "endDate": 20,
        "category": "HEALTH",
        "priority": "LOW",
        "reminder": {"minutes": 15}
    }]"#;
    prefs(&conn, TASKS_NAMESPACE).put_string(TASKS_KEY, blob).unwrap();

    let store = open_store(&conn);
    assert_eq!(store.tasks().len(), 1);
    let task = store.get("z").unwrap();
    assert!(task.in_progress);
    assert_eq!(task.priority, TaskPriority::Low);
    assert_eq!(task.category, TaskCategory::Health);
}

#[test]
fn complete_is_idempotent_and_clears_in_progress() {
    let conn = shared_memory_db();
    let mut store = open_store(&conn);
    store.start("1").unwrap();

    store.complete("1").unwrap();
    let once = store.get("1").unwrap().clone();
    store.complete("1").unwrap();
    let twice = store.get("1").unwrap().clone();

    assert!(once.is_completed && !once.in_progress);
    assert_eq!(once, twice);
}

#[test]
fn start_then_reset_clears_both_flags() {
    let conn = shared_memory_db();
    let mut store = open_store(&conn);
    store.complete("2").unwrap();

    store.start("2").unwrap();
    let started = store.get("2").unwrap();
    assert!(started.in_progress && !started.is_completed);

    store.reset("2").unwrap();
    let reset = store.get("2").unwrap();
    assert!(!reset.in_progress && !reset.is_completed);
}

#[test]
fn pending_count_tracks_incomplete_tasks() {
    let conn = shared_memory_db();
    let mut store = open_store(&conn);
    assert_eq!(store.pending_count(), 3);

    store.complete("1").unwrap();
    store.start("2").unwrap();
    assert_eq!(store.pending_count(), 2);

    for id in ["1", "2", "3"] {
        store.delete(id).unwrap();
    }
    assert!(store.tasks().is_empty());
    assert_eq!(store.pending_count(), 0);
}

#[test]
fn display_order_puts_open_high_priority_first() {
    let conn = shared_memory_db();
    let mut store = open_store(&conn);
    for id in ["1", "2", "3"] {
        store.delete(id).unwrap();
    }

    store
        .add(Task::new("A", "a", "").with_priority(TaskPriority::Low))
        .unwrap();
    store
        .add(Task::new("B", "b", "").with_priority(TaskPriority::High))
        .unwrap();
    store
        .add(Task::new("C", "c", "").with_priority(TaskPriority::Medium))
        .unwrap();
    store.complete("C").unwrap();

    let ids: Vec<_> = store
        .sorted_for_display()
        .into_iter()
        .map(|task| task.id)
        .collect();
    assert_eq!(ids, ["B", "A", "C"]);
}

#[test]
fn unknown_ids_are_silent_no_ops() {
    let conn = shared_memory_db();
    let mut store = open_store(&conn);
    let before = store.tasks().to_vec();

    assert!(!store.update(Task::new("nope", "x", "y")).unwrap());
    assert!(!store.complete("nope").unwrap());
    assert!(!store.start("nope").unwrap());
    assert!(!store.reset("nope").unwrap());
    store.delete("nope").unwrap();

    assert_eq!(store.tasks(), before.as_slice());
}

#[test]
fn update_replaces_matching_task() {
    let conn = shared_memory_db();
    let mut store = open_store(&conn);
    let mut edited = store.get("3").unwrap().clone();
    edited.title = "Plan the week".to_string();
    edited.priority = TaskPriority::High;

    assert!(store.update(edited.clone()).unwrap());
    assert_eq!(store.get("3"), Some(&edited));
    assert_eq!(open_store(&conn).get("3"), Some(&edited));
}

#[test]
fn delete_removes_every_duplicate_id() {
    let conn = shared_memory_db();
    let mut store = open_store(&conn);
    store.add(Task::new("dup", "first", "")).unwrap();
    store.add(Task::new("dup", "second", "")).unwrap();

    store.delete("dup").unwrap();
    assert!(store.get("dup").is_none());
    assert_eq!(store.tasks().len(), 3);
}

#[test]
fn observers_see_state_after_it_is_persisted() {
    let conn = shared_memory_db();
    let mut store = open_store(&conn);
    let observed = Arc::new(Mutex::new(Vec::new()));

    let sink = observed.clone();
    let probe_conn = conn.clone();
    store.subscribe(move |tasks| {
        let persisted: Vec<Task> =
            serde_json::from_str(&stored_blob(&probe_conn).unwrap()).unwrap();
        sink.lock().unwrap().push((tasks.len(), persisted.len()));
    });

    store.add(Task::new("n", "new", "")).unwrap();
    store.delete("1").unwrap();

    assert_eq!(*observed.lock().unwrap(), vec![(4, 4), (3, 3)]);
}

#[test]
fn default_task_windows_span_one_day() {
    for task in default_tasks() {
        assert_eq!(task.end_date - task.start_date, 24 * 60 * 60 * 1000);
    }
}
