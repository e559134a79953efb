//! Walkthrough Scenario Tests
//!
//! The documented create/set/get/all/delete/truncate/drop sequence, plus
//! persistence across reopen for file-backed SQLite.

use crate::*;
use tabula::{Relational, TableHandle};

async fn walkthrough(db: &Instance) {
    db.create("main").await.unwrap();
    db.set("main", "a", 1).await.unwrap();
    db.set("main", "b", 2).await.unwrap();
    db.set("main", "c", 3).await.unwrap();

    let b = db.get("main", "b").await.unwrap();
    assert_eq!(b, Some(Data::new("b", 2)));

    let picked = db
        .all(
            "main",
            AllOptions::new().filter(|row| ["a", "c"].contains(&row.key.as_str())),
        )
        .await
        .unwrap();
    let keys: Vec<_> = picked.iter().map(|r| r.key.as_str()).collect();
    assert_eq!(keys, vec!["a", "c"]);
    assert_eq!(picked[1].data.value, Value::from(3));

    assert!(db.delete("main", "b").await.unwrap());

    db.truncate("main").await.unwrap();
    assert!(db.all("main", AllOptions::new()).await.unwrap().is_empty());

    db.drop("main").await.unwrap();
    let err = db.get("main", "a").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_walkthrough_memory() {
    walkthrough(&memory_instance()).await;
}

#[tokio::test]
async fn test_walkthrough_sqlite() {
    walkthrough(&sqlite_instance()).await;
}

#[tokio::test]
async fn test_walkthrough_sqlite_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = Instance::builder()
        .sqlite(dir.path().join("walkthrough.sqlite"))
        .open()
        .unwrap();
    walkthrough(&db).await;
}

#[tokio::test]
async fn test_config_file_drives_backend() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("configured.sqlite");
    let config_path = dir.path().join("tabula.toml");
    std::fs::write(
        &config_path,
        format!(
            "benchmark = false\n\n[backend]\nkind = \"sqlite\"\npath = {:?}\n",
            db_path.display().to_string()
        ),
    )
    .unwrap();

    let config = Config::load(&config_path).unwrap();
    let db = Instance::open(config).unwrap();
    assert_eq!(db.backend_name(), "sqlite");
    assert!(!db.config().benchmark);

    db.create("main").await.unwrap();
    db.set("main", "k", "v").await.unwrap();
    assert!(db_path.exists());
}

#[tokio::test]
async fn test_rows_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reopen.sqlite");

    {
        let db = Instance::builder().sqlite(&path).open().unwrap();
        db.create("main").await.unwrap();
        for (name, value) in standard_test_values() {
            db.set("main", name, value).await.unwrap();
        }
    }

    // A new instance has an empty registry, so the table is unknown to it
    // even though the file still holds its rows.
    let db = Instance::builder().sqlite(&path).open().unwrap();
    assert!(db.get("main", "int").await.unwrap_err().is_not_found());

    let backend = SqliteBackend::open(&path).unwrap();
    let table = backend
        .define(tabula::Schema::attribute("main"))
        .unwrap();
    let log = tabula::QueryLog::disabled();
    for (name, value) in standard_test_values() {
        let record = table.find_by_key(name, &log).await.unwrap().unwrap();
        assert_eq!(tabula::decode(&record).unwrap().value, value, "type: {}", name);
    }
}
