//! Event Bus Tests
//!
//! Tests for change and debug notifications.

use crate::*;

// =============================================================================
// CHANGE EVENTS
// =============================================================================

#[tokio::test]
async fn test_one_change_per_mutation() {
    for (backend, db) in instances() {
        let changes = record_changes(&db);

        db.create("main").await.unwrap();
        db.set("main", "k", 1).await.unwrap();
        db.set("main", "k", 2).await.unwrap();
        db.delete("main", "k").await.unwrap();
        db.delete("main", "k").await.unwrap();
        db.truncate("main").await.unwrap();
        db.drop("main").await.unwrap();

        assert_eq!(
            *changes.lock(),
            vec![
                Change::Create("main".into()),
                Change::Set {
                    key: "k".into(),
                    updated: Some(false)
                },
                Change::Set {
                    key: "k".into(),
                    updated: Some(true)
                },
                Change::Delete("k".into()),
                Change::Delete("k".into()),
                Change::Truncate("main".into()),
                Change::Drop("main".into()),
            ],
            "backend: {}",
            backend
        );
    }
}

#[tokio::test]
async fn test_reads_emit_no_change() {
    for (_, db) in instances_with_main().await {
        let changes = record_changes(&db);
        db.get("main", "k").await.unwrap();
        db.all("main", AllOptions::new()).await.unwrap();
        assert!(changes.lock().is_empty());
    }
}

#[tokio::test]
async fn test_failed_operations_emit_nothing() {
    let db = memory_instance();
    db.create("main").await.unwrap();
    let changes = record_changes(&db);

    assert!(db.create("main").await.is_err());
    assert!(db.set("ghost", "k", 1).await.is_err());
    assert!(db
        .set("main", "k", Value::array([Value::from(Symbol::new("x"))]))
        .await
        .is_err());
    assert!(db.drop("ghost").await.is_err());

    assert!(changes.lock().is_empty());
}

#[tokio::test]
async fn test_change_ops() {
    let db = memory_instance();
    let changes = record_changes(&db);
    db.create("main").await.unwrap();
    db.set("main", "k", ()).await.unwrap();

    let ops: Vec<ChangeOp> = changes.lock().iter().map(Change::op).collect();
    assert_eq!(ops, vec![ChangeOp::Create, ChangeOp::Set]);
}

// =============================================================================
// SUBSCRIPTION MANAGEMENT
// =============================================================================

#[tokio::test]
async fn test_off_stops_delivery() {
    let db = memory_instance();
    let changes = Arc::new(Mutex::new(0));
    let sink = Arc::clone(&changes);
    let id = db.on_change(move |_| *sink.lock() += 1);

    db.create("a").await.unwrap();
    assert!(db.off(id));
    db.create("b").await.unwrap();

    assert_eq!(*changes.lock(), 1);
    assert!(!db.off(id));
}

#[tokio::test]
async fn test_listener_counts() {
    let db = memory_instance();
    let _changes = record_changes(&db);
    let _debug = record_debug(&db);
    let _more = record_changes(&db);

    assert_eq!(db.listener_count(EventKind::Change), 2);
    assert_eq!(db.listener_count(EventKind::Debug), 1);

    db.remove_all_listeners(EventKind::Change);
    assert_eq!(db.listener_count(EventKind::Change), 0);
    assert_eq!(db.listener_count(EventKind::Debug), 1);
}

#[tokio::test]
async fn test_instances_do_not_share_listeners() {
    let first = memory_instance();
    let second = memory_instance();
    let changes = record_changes(&first);

    second.create("main").await.unwrap();
    assert!(changes.lock().is_empty());
}

// =============================================================================
// DEBUG EVENTS
// =============================================================================

#[tokio::test]
async fn test_debug_labels_per_operation() {
    for (backend, db) in instances() {
        let debug = record_debug(&db);

        db.create("main").await.unwrap();
        db.set("main", "k", 1).await.unwrap();
        db.get("main", "k").await.unwrap();
        db.all("main", AllOptions::new()).await.unwrap();
        db.delete("main", "k").await.unwrap();
        db.truncate("main").await.unwrap();
        db.drop("main").await.unwrap();

        let labels: Vec<String> = debug
            .lock()
            .iter()
            .map(|m| m.lines().next().unwrap_or_default().to_string())
            .collect();
        assert_eq!(
            labels,
            vec![
                "CREATE TABLE",
                "UPSERT DATA",
                "FIND ONE",
                "FIND ALL",
                "DELETE DATA",
                "TRUNCATE TABLE",
                "DROP TABLE",
            ],
            "backend: {}",
            backend
        );

        for message in debug.lock().iter() {
            let lines: Vec<&str> = message.lines().collect();
            assert!(lines.len() >= 3, "message: {:?}", message);
            assert!(lines[1].starts_with("Finished in ") && lines[1].ends_with("ms"));
        }
    }
}

#[tokio::test]
async fn test_debug_disabled_without_benchmark() {
    let db = Instance::builder()
        .sqlite_in_memory()
        .benchmark(false)
        .open()
        .unwrap();
    let debug = record_debug(&db);

    db.create("main").await.unwrap();
    db.set("main", "k", 1).await.unwrap();
    assert!(debug.lock().is_empty());
}
