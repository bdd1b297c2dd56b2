//! Behaviour every record store backend must share.
//!
//! Each backend test file builds its store and runs these checks against it.

#![allow(dead_code)]

use bson::{doc, oid::ObjectId, Document};
use std::sync::Arc;
use uploader_core::models::ImageSource;
use uploader_db::{RecordStore, StoreError, UpdateOutcome};

pub fn hosted_fields(name: &str) -> Document {
    doc! {
        "name": name,
        "image": {
            "publicId": format!("Simple-Image-Uploader/{}", name),
            "url": format!("https://res.example.com/{}.png", name),
        },
    }
}

pub fn direct_fields(name: &str) -> Document {
    doc! { "name": name, "url": format!("https://cdn.example.com/{}.png", name) }
}

pub async fn insert_then_find_returns_same_fields(store: Arc<dyn RecordStore>) {
    let id = store
        .insert(hosted_fields("cat"))
        .await
        .expect("insert should succeed");

    let record = store
        .find_by_id(&id.to_hex())
        .await
        .expect("record should exist");

    assert_eq!(record.id, id);
    assert_eq!(record.name, "cat");
    assert_eq!(record.public_id(), Some("Simple-Image-Uploader/cat"));
    assert_eq!(record.source.url(), "https://res.example.com/cat.png");
}

pub async fn list_preserves_insertion_order(store: Arc<dyn RecordStore>) {
    for name in ["first", "second", "third"] {
        store
            .insert(hosted_fields(name))
            .await
            .expect("insert should succeed");
    }

    let names: Vec<String> = store
        .list_all()
        .await
        .expect("list should succeed")
        .into_iter()
        .map(|r| r.name)
        .collect();

    assert_eq!(names, vec!["first", "second", "third"]);
}

pub async fn delete_then_find_is_not_found(store: Arc<dyn RecordStore>) {
    let id = store
        .insert(hosted_fields("dog"))
        .await
        .expect("insert should succeed")
        .to_hex();

    assert!(store.delete_by_id(&id).await.expect("delete should succeed"));
    assert!(matches!(
        store.find_by_id(&id).await,
        Err(StoreError::NotFound(_))
    ));
    assert!(!store
        .delete_by_id(&id)
        .await
        .expect("second delete should not error"));
}

pub async fn empty_update_reports_existence(store: Arc<dyn RecordStore>) {
    let id = store
        .insert(hosted_fields("owl"))
        .await
        .expect("insert should succeed")
        .to_hex();

    assert_eq!(
        store.update(&id, doc! {}).await.expect("update should succeed"),
        UpdateOutcome::Unchanged
    );
    assert_eq!(
        store
            .update(&ObjectId::new().to_hex(), doc! {})
            .await
            .expect("update should succeed"),
        UpdateOutcome::NotMatched
    );
}

pub async fn partial_update_merges_nested_paths(store: Arc<dyn RecordStore>) {
    let id = store
        .insert(hosted_fields("fox"))
        .await
        .expect("insert should succeed")
        .to_hex();

    let outcome = store
        .update(&id, doc! { "name": "renamed", "image.url": "https://res.example.com/new.png" })
        .await
        .expect("update should succeed");
    assert_eq!(outcome, UpdateOutcome::Modified);

    let record = store.find_by_id(&id).await.expect("record should exist");
    assert_eq!(record.name, "renamed");
    assert_eq!(record.public_id(), Some("Simple-Image-Uploader/fox"));
    assert_eq!(record.source.url(), "https://res.example.com/new.png");

    let repeat = store
        .update(&id, doc! { "name": "renamed" })
        .await
        .expect("update should succeed");
    assert_eq!(repeat, UpdateOutcome::Unchanged);
}

pub async fn hosted_schema_rejects_bad_documents(store: Arc<dyn RecordStore>) {
    let missing_image = doc! { "name": "cat" };
    assert!(matches!(
        store.insert(missing_image).await,
        Err(StoreError::Validation(_))
    ));

    let mut extra = hosted_fields("cat");
    extra.insert("owner", "someone");
    assert!(matches!(
        store.insert(extra).await,
        Err(StoreError::Validation(_))
    ));

    let empty_name = doc! { "name": "", "image": { "publicId": "p", "url": "u" } };
    assert!(matches!(
        store.insert(empty_name).await,
        Err(StoreError::Validation(_))
    ));

    let id = store
        .insert(hosted_fields("cat"))
        .await
        .expect("insert should succeed")
        .to_hex();
    assert!(matches!(
        store.update(&id, doc! { "tags": ["a"] }).await,
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.update(&id, doc! { "image.width": 10 }).await,
        Err(StoreError::Validation(_))
    ));
}

pub async fn direct_schema_accepts_only_name_and_url(store: Arc<dyn RecordStore>) {
    let id = store
        .insert(direct_fields("cat"))
        .await
        .expect("insert should succeed");
    let record = store
        .find_by_id(&id.to_hex())
        .await
        .expect("record should exist");
    assert_eq!(
        record.source,
        ImageSource::Direct {
            url: "https://cdn.example.com/cat.png".to_string()
        }
    );

    assert!(matches!(
        store.insert(hosted_fields("dog")).await,
        Err(StoreError::Validation(_))
    ));
}

pub async fn malformed_ids_are_rejected(store: Arc<dyn RecordStore>) {
    assert!(matches!(
        store.find_by_id("nonexistent-id").await,
        Err(StoreError::InvalidId(_))
    ));
    assert!(matches!(
        store.update("nonexistent-id", doc! { "name": "x" }).await,
        Err(StoreError::InvalidId(_))
    ));
    assert!(matches!(
        store.delete_by_id("nonexistent-id").await,
        Err(StoreError::InvalidId(_))
    ));
    assert!(matches!(
        store.find_by_id(&ObjectId::new().to_hex()).await,
        Err(StoreError::NotFound(_))
    ));
}

pub async fn client_supplied_id_is_rejected(store: Arc<dyn RecordStore>) {
    let mut fields = hosted_fields("cat");
    fields.insert("_id", ObjectId::new());
    assert!(matches!(
        store.insert(fields).await,
        Err(StoreError::Validation(_))
    ));

    let id = store
        .insert(hosted_fields("cat"))
        .await
        .expect("insert should succeed")
        .to_hex();
    assert!(matches!(
        store.update(&id, doc! { "_id": ObjectId::new() }).await,
        Err(StoreError::Validation(_))
    ));
}

pub async fn client_errors_in_partial_updates_are_validation(store: Arc<dyn RecordStore>) {
    let id = store
        .insert(hosted_fields("cat"))
        .await
        .expect("insert should succeed")
        .to_hex();

    let overlapping = doc! {
        "image": {
            "publicId": "Simple-Image-Uploader/cat",
            "url": "https://res.example.com/other.png",
        },
        "image.url": "https://res.example.com/third.png",
    };
    assert!(matches!(
        store.update(&id, overlapping).await,
        Err(StoreError::Validation(_))
    ));

    assert!(matches!(
        store.update(&id, doc! { "name.first": "x" }).await,
        Err(StoreError::Validation(_))
    ));

    let record = store.find_by_id(&id).await.expect("record should exist");
    assert_eq!(record.name, "cat");
    assert_eq!(record.source.url(), "https://res.example.com/cat.png");
}

pub async fn hosted_public_id_cannot_change(store: Arc<dyn RecordStore>) {
    let a = store
        .insert(hosted_fields("a"))
        .await
        .expect("insert should succeed")
        .to_hex();
    store
        .insert(hosted_fields("b"))
        .await
        .expect("insert should succeed");

    assert!(matches!(
        store
            .update(&a, doc! { "image.publicId": "Simple-Image-Uploader/b" })
            .await,
        Err(StoreError::Validation(_))
    ));

    let replacement = doc! {
        "image": {
            "publicId": "Simple-Image-Uploader/b",
            "url": "https://res.example.com/b.png",
        },
    };
    assert!(matches!(
        store.update(&a, replacement).await,
        Err(StoreError::Validation(_))
    ));

    let record = store.find_by_id(&a).await.expect("record should exist");
    assert_eq!(record.public_id(), Some("Simple-Image-Uploader/a"));

    // Repeating the stored id is allowed.
    let same_id = doc! {
        "image": {
            "publicId": "Simple-Image-Uploader/a",
            "url": "https://res.example.com/a-v2.png",
        },
    };
    assert_eq!(
        store.update(&a, same_id).await.expect("update should succeed"),
        UpdateOutcome::Modified
    );
    assert_eq!(
        store
            .update(&a, doc! { "image.publicId": "Simple-Image-Uploader/a" })
            .await
            .expect("update should succeed"),
        UpdateOutcome::Unchanged
    );

    assert_eq!(
        store
            .update(
                &ObjectId::new().to_hex(),
                doc! { "image.publicId": "Simple-Image-Uploader/a" }
            )
            .await
            .expect("update should succeed"),
        UpdateOutcome::NotMatched
    );
}
