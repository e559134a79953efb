//! Instance API Test Suite
//!
//! Exercises the public `Instance` surface end to end against every
//! backend: table lifecycle, data access, the change/debug bus and the
//! documented walkthrough scenario.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run the whole suite
//! cargo test --test instance_api
//!
//! # Run event tests only
//! cargo test --test instance_api events::
//! ```

use parking_lot::Mutex;
use std::sync::Arc;
use tabula::prelude::*;

// Test modules
pub mod data_ops;
pub mod events;
pub mod scenario;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Route `tracing` output through the test harness
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Instance over the in-memory backend
pub fn memory_instance() -> Instance {
    init_tracing();
    Instance::builder()
        .memory()
        .open()
        .expect("Failed to open memory instance")
}

/// Instance over a private in-memory SQLite database
pub fn sqlite_instance() -> Instance {
    init_tracing();
    Instance::builder()
        .sqlite_in_memory()
        .open()
        .expect("Failed to open sqlite instance")
}

/// One fresh instance per backend
pub fn instances() -> Vec<(&'static str, Instance)> {
    vec![("memory", memory_instance()), ("sqlite", sqlite_instance())]
}

/// Instance with a `main` table already created, one per backend
pub async fn instances_with_main() -> Vec<(&'static str, Instance)> {
    let all = instances();
    for (_, db) in &all {
        db.create("main").await.expect("Failed to create main");
    }
    all
}

/// Collect every change event the instance emits
pub fn record_changes(db: &Instance) -> Arc<Mutex<Vec<Change>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    db.on_change(move |change| sink.lock().push(change.clone()));
    seen
}

/// Collect every debug message the instance emits
pub fn record_debug(db: &Instance) -> Arc<Mutex<Vec<String>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    db.on_debug(move |message| sink.lock().push(message.to_string()));
    seen
}

/// Standard test values covering every storable category
pub fn standard_test_values() -> Vec<(&'static str, Value)> {
    vec![
        ("null", Value::Null),
        ("undefined", Value::Undefined),
        ("nan", Value::Number(f64::NAN)),
        ("inf_pos", Value::Number(f64::INFINITY)),
        ("inf_neg", Value::Number(f64::NEG_INFINITY)),
        ("bool_true", Value::Bool(true)),
        ("bool_false", Value::Bool(false)),
        ("int", Value::from(42)),
        ("float_neg", Value::from(-2.5)),
        ("zero", Value::from(0)),
        ("string", Value::from("hello world")),
        ("string_unicode", Value::from("日本語 🌍")),
        ("string_empty", Value::from("")),
        ("bytes", Value::bytes(vec![0x00, 0x01, 0xFF, 0xFE])),
        ("array", Value::array([Value::from(1), Value::from("two")])),
        ("array_empty", Value::Array(vec![])),
        (
            "object",
            Value::object([
                ("nested", Value::object([("deep", Value::from(true))])),
                ("list", Value::array([Value::Null, Value::from(1.5)])),
            ]),
        ),
    ]
}
