//! End-to-end behavior across the blob, key-value and collection layers.

use std::fs;
use std::sync::Arc;

use chrono::{Local, TimeZone};
use collection_literals::btree;
use serde::{Deserialize, Serialize};

use fsstore::{
    date_defaults, CollectionStorage, ErrorKind, Fields, FixedClock, JsonSerializer,
    KeyValueStorage, NativeSerializer, Serializer, StoreConfig, TypedKeyValue, Value,
};

fn json() -> Arc<dyn Serializer> {
    Arc::new(JsonSerializer::new())
}

#[test]
fn layout_on_disk_follows_namespace_and_key() {
    let dir = tempfile::tempdir().unwrap();
    let storage = KeyValueStorage::new(dir.path(), "kv", json()).unwrap();

    storage.set("users/42/profile", btree! {
        "name".to_string() => Value::from("Ada"),
    })
    .unwrap();

    let path = dir.path().join("kv/users/42/profile.json");
    assert_eq!(fs::read_to_string(path).unwrap(), r#"{"name":"Ada"}"#);
}

#[test]
fn keys_track_sets_and_deletes_at_any_depth() {
    let dir = tempfile::tempdir().unwrap();
    let storage = KeyValueStorage::new(dir.path(), "kv", json()).unwrap();

    for key in ["a", "b/c", "b/d/e", "f/g/h/i"] {
        storage.set(key, key).unwrap();
    }
    storage.delete("b/c").unwrap();
    storage.delete("missing/key").unwrap();

    assert_eq!(storage.keys().unwrap(), vec!["a", "b/d/e", "f/g/h/i"]);
    for key in ["a", "b/d/e", "f/g/h/i"] {
        assert_eq!(storage.get(key).unwrap(), Value::from(key));
    }

    storage.delete("f/g/h/i").unwrap();
    assert!(!dir.path().join("kv/f").exists());
    assert!(dir.path().join("kv/b/d").is_dir());
}

#[test]
fn double_delete_is_harmless() {
    let dir = tempfile::tempdir().unwrap();
    let storage = KeyValueStorage::new(dir.path(), "kv", json()).unwrap();
    storage.set("k", 1).unwrap();

    storage.delete("k").unwrap();
    storage.delete("k").unwrap();
    assert!(!storage.has("k").unwrap());
}

#[test]
fn namespaces_share_a_root_without_mixing() {
    let dir = tempfile::tempdir().unwrap();
    let users = KeyValueStorage::new(dir.path(), "users", json()).unwrap();
    let posts = KeyValueStorage::new(dir.path(), "posts", json()).unwrap();

    users.set("1", "ada").unwrap();
    posts.set("1", "hello").unwrap();

    assert_eq!(users.get("1").unwrap(), Value::from("ada"));
    assert_eq!(posts.get("1").unwrap(), Value::from("hello"));

    users.purge().unwrap();
    assert!(users.keys().unwrap().is_empty());
    assert_eq!(posts.keys().unwrap(), vec!["1"]);
}

#[test]
fn native_serializer_keeps_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let storage = KeyValueStorage::new(dir.path(), "bin", Arc::new(NativeSerializer)).unwrap();
    let value = Value::from(vec![0u8, 159, 146, 150]);

    storage.set("blob", value.clone()).unwrap();
    assert_eq!(storage.get("blob").unwrap(), value);
    assert!(dir.path().join("bin/blob.bin").is_file());
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Post {
    year: String,
    month: String,
    day: String,
    slug: String,
    id: i64,
    title: String,
}

#[test]
fn collection_round_trip_through_typed_access() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(KeyValueStorage::new(dir.path(), "collection", json()).unwrap());
    let clock = FixedClock::new(Local.with_ymd_and_hms(2021, 1, 5, 8, 0, 0).unwrap());
    let posts = CollectionStorage::new(
        "posts/{year}/{month}/{slug}-{id}",
        date_defaults(clock, |mut fields: Fields| {
            fields.entry("id".to_string()).or_insert(Value::Integer(1));
            Ok(fields)
        }),
        Arc::clone(&storage),
    )
    .unwrap();

    let key = posts
        .store(btree! {
            "slug".to_string() => Value::from("hello-world"),
            "title".to_string() => Value::from("Hello World"),
        })
        .unwrap();
    assert_eq!(key, "posts/2021/01/hello-world-1");

    let post: Post = storage.get_as(&key).unwrap();
    assert_eq!(
        post,
        Post {
            year: "2021".into(),
            month: "01".into(),
            day: "05".into(),
            slug: "hello-world".into(),
            id: 1,
            title: "Hello World".into(),
        }
    );

    assert_eq!(posts.all().unwrap(), storage.keys().unwrap());
    posts.delete(key.as_str()).unwrap();
    assert!(storage.keys().unwrap().is_empty());
    assert!(dir.path().join("collection").is_dir());
}

#[test]
fn never_written_key_names_its_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        root: dir.path().join(".storage"),
        namespace: "kv".to_string(),
        ..StoreConfig::default()
    };
    let storage = config.open().unwrap();

    let err = storage.get("invalid-key").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err
        .to_string()
        .contains(&dir.path().join(".storage/kv/invalid-key.json").display().to_string()));
}

#[test]
fn concurrent_writers_to_distinct_keys() {
    let dir = tempfile::tempdir().unwrap();
    let storage = KeyValueStorage::new(dir.path(), "kv", json()).unwrap();

    std::thread::scope(|scope| {
        for thread in 0..4 {
            let storage = &storage;
            scope.spawn(move || {
                for i in 0..25 {
                    storage.set(&format!("t{thread}/k{i:02}"), i).unwrap();
                }
            });
        }
    });

    assert_eq!(storage.keys().unwrap().len(), 100);
    assert_eq!(storage.get("t3/k24").unwrap(), Value::Integer(24));
}
