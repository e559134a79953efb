//! Data Access Tests
//!
//! Tests for set, get, all and delete.

use crate::*;

// =============================================================================
// SET / GET
// =============================================================================

#[tokio::test]
async fn test_set_and_get_all_value_types() {
    for (backend, db) in instances_with_main().await {
        for (name, value) in standard_test_values() {
            db.set("main", name, value.clone()).await.unwrap();

            let data = db.get("main", name).await.unwrap();
            assert_eq!(
                data,
                Some(Data::new(name, value)),
                "backend: {}, type: {}",
                backend,
                name
            );
        }
    }
}

#[tokio::test]
async fn test_set_overwrites_existing() {
    for (backend, db) in instances_with_main().await {
        assert_eq!(db.set("main", "k", 1).await.unwrap(), Some(false));
        assert_eq!(db.set("main", "k", "two").await.unwrap(), Some(true));

        let data = db.get("main", "k").await.unwrap().unwrap();
        assert_eq!(data.value, Value::from("two"), "backend: {}", backend);
    }
}

#[tokio::test]
async fn test_get_missing_key_returns_none() {
    for (backend, db) in instances_with_main().await {
        assert!(db.get("main", "nope").await.unwrap().is_none(), "backend: {}", backend);
    }
}

#[tokio::test]
async fn test_infinity_sign_preserved() {
    for (_, db) in instances_with_main().await {
        db.set("main", "up", f64::INFINITY).await.unwrap();
        db.set("main", "down", f64::NEG_INFINITY).await.unwrap();

        let up = db.get("main", "up").await.unwrap().unwrap().value;
        let down = db.get("main", "down").await.unwrap().unwrap().value;
        assert_eq!(up.as_number(), Some(f64::INFINITY));
        assert_eq!(down.as_number(), Some(f64::NEG_INFINITY));
    }
}

#[tokio::test]
async fn test_registered_symbol_keeps_identity() {
    for (_, db) in instances_with_main().await {
        let sym = Symbol::for_label("instance-api.registered");
        db.set("main", "sym", sym.clone()).await.unwrap();

        let value = db.get("main", "sym").await.unwrap().unwrap().value;
        assert_eq!(value.as_symbol(), Some(&sym));
    }
}

#[tokio::test]
async fn test_unregistered_symbol_keeps_label_only() {
    for (_, db) in instances_with_main().await {
        let sym = Symbol::new("instance-api.local");
        db.set("main", "sym", sym.clone()).await.unwrap();

        let value = db.get("main", "sym").await.unwrap().unwrap().value;
        let back = value.as_symbol().expect("expected a symbol");
        assert_eq!(back.description(), "instance-api.local");
        assert_ne!(back, &sym);
    }
}

#[tokio::test]
async fn test_nested_symbol_rejected() {
    for (backend, db) in instances_with_main().await {
        let value = Value::array([Value::from(Symbol::new("inner"))]);
        let err = db.set("main", "k", value).await.unwrap_err();

        assert!(err.is_invalid_type(), "backend: {}", backend);
        assert_eq!(
            err.to_string(),
            "Invalid type given on value, got 'symbol' instead"
        );
        assert!(db.get("main", "k").await.unwrap().is_none());
    }
}

fn nested_arrays(levels: usize) -> Value {
    (0..levels).fold(Value::Null, |inner, _| Value::Array(vec![inner]))
}

#[tokio::test]
async fn test_deep_nesting_bounded() {
    for (backend, db) in instances_with_main().await {
        let deepest = nested_arrays(tabula::MAX_DEPTH);
        db.set("main", "deep", deepest.clone()).await.unwrap();
        assert_eq!(
            db.get("main", "deep").await.unwrap().map(|d| d.value),
            Some(deepest),
            "backend: {}",
            backend
        );

        let err = db
            .set("main", "too-deep", nested_arrays(tabula::MAX_DEPTH + 1))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Serialization(_)), "backend: {}", backend);
        assert!(db.get("main", "too-deep").await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_json_values_store_as_objects() {
    for (_, db) in instances_with_main().await {
        let doc = serde_json::json!({"name": "Alice", "tags": ["a", "b"], "age": 30});
        db.set("main", "user:1", doc.clone()).await.unwrap();

        let value = db.get("main", "user:1").await.unwrap().unwrap().value;
        assert_eq!(value, Value::from(doc));
    }
}

#[tokio::test]
async fn test_key_too_long_rejected() {
    for (backend, db) in instances_with_main().await {
        let key = "k".repeat(1025);
        let err = db.set("main", &key, 1).await.unwrap_err();
        assert!(matches!(err, Error::InvalidKey(_)), "backend: {}", backend);

        let key = "k".repeat(1024);
        assert_eq!(db.set("main", &key, 1).await.unwrap(), Some(false));
    }
}

// =============================================================================
// ALL
// =============================================================================

#[tokio::test]
async fn test_all_returns_every_row() {
    for (backend, db) in instances_with_main().await {
        for (i, key) in ["a", "b", "c"].iter().enumerate() {
            db.set("main", key, i).await.unwrap();
        }

        let rows = db.all("main", AllOptions::new()).await.unwrap();
        let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"], "backend: {}", backend);
        for row in &rows {
            assert_eq!(row.key, row.data.key);
        }
    }
}

#[tokio::test]
async fn test_all_filters_decoded_values() {
    for (backend, db) in instances_with_main().await {
        for n in 0..6 {
            db.set("main", &format!("n{}", n), n).await.unwrap();
        }

        let even = db
            .all(
                "main",
                AllOptions::new().filter(|row| {
                    row.data.value.as_number().map_or(false, |n| n % 2.0 == 0.0)
                }),
            )
            .await
            .unwrap();
        let keys: Vec<_> = even.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["n0", "n2", "n4"], "backend: {}", backend);
    }
}

#[tokio::test]
async fn test_all_paginates_before_filtering() {
    for (backend, db) in instances_with_main().await {
        for key in ["a", "b", "c", "d"] {
            db.set("main", key, key).await.unwrap();
        }

        let page = db
            .all("main", AllOptions::new().offset(1).limit(2))
            .await
            .unwrap();
        let keys: Vec<_> = page.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "c"], "backend: {}", backend);

        // the filter only sees the page, so fewer than `limit` rows come back
        let filtered = db
            .all(
                "main",
                AllOptions::new().limit(2).filter(|row| row.key != "a"),
            )
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1, "backend: {}", backend);
        assert_eq!(filtered[0].key, "b");
    }
}

// =============================================================================
// DELETE
// =============================================================================

#[tokio::test]
async fn test_delete_true_once_then_false() {
    for (backend, db) in instances_with_main().await {
        db.set("main", "k", 1).await.unwrap();

        assert!(db.delete("main", "k").await.unwrap(), "backend: {}", backend);
        assert!(!db.delete("main", "k").await.unwrap(), "backend: {}", backend);
        assert!(db.get("main", "k").await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_delete_leaves_other_keys() {
    for (_, db) in instances_with_main().await {
        db.set("main", "a", 1).await.unwrap();
        db.set("main", "b", 2).await.unwrap();
        db.delete("main", "a").await.unwrap();

        let rows = db.all("main", AllOptions::new()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].data, Data::new("b", 2));
    }
}

#[tokio::test]
async fn test_tables_are_independent() {
    for (_, db) in instances() {
        db.create("left").await.unwrap();
        db.create("right").await.unwrap();
        db.set("left", "k", "l").await.unwrap();
        db.set("right", "k", "r").await.unwrap();

        db.truncate("left").await.unwrap();
        assert!(db.get("left", "k").await.unwrap().is_none());
        assert_eq!(
            db.get("right", "k").await.unwrap().map(|d| d.value),
            Some(Value::from("r"))
        );
    }
}
