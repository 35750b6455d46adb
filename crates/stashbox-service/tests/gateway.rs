//! Integration tests for tree mutation and grant issuance.

mod common;

use std::time::Duration;

use bytes::Bytes;
use chrono::Utc;

use common::{TestGateway, read_archive};
use stashbox_core::error::ErrorKind;
use stashbox_core::traits::ObjectStore;
use stashbox_core::types::{FolderId, StorageKey, UserId};
use stashbox_entity::MetadataCatalog;
use stashbox_service::{CreateFolderRequest, MAX_GRANT_TTL, StoreFileRequest};

#[tokio::test]
async fn test_docs_sub_scenario() {
    let gw = TestGateway::new();
    let owner = UserId::new();

    let docs = gw.folder(owner, "Docs", None).await;
    let sub = gw.folder(owner, "Sub", Some(docs.id)).await;
    gw.file(owner, Some(docs.id), "a.txt", "hello").await;

    let entries = read_archive(gw.archives.assemble(docs.id).await.unwrap()).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0], ("a.txt".to_string(), b"hello".to_vec()));

    let err = gw.archives.assemble(sub.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::EmptyFolder);

    let roots = gw.tree.list_folders(owner, None).await.unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].name, "Docs");
    let children = gw.tree.list_folders(owner, Some(docs.id)).await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "Sub");
}

#[tokio::test]
async fn test_create_folder_with_missing_parent() {
    let gw = TestGateway::new();
    let err = gw
        .tree
        .create_folder(CreateFolderRequest {
            owner_id: UserId::new(),
            name: "Orphan".to_string(),
            parent_id: Some(FolderId::new()),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidParent);
}

#[tokio::test]
async fn test_create_folder_under_foreign_parent() {
    let gw = TestGateway::new();
    let alice = UserId::new();
    let bob = UserId::new();
    let alices = gw.folder(alice, "Private", None).await;

    let err = gw
        .tree
        .create_folder(CreateFolderRequest {
            owner_id: bob,
            name: "Sneaky".to_string(),
            parent_id: Some(alices.id),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidParent);
}

#[tokio::test]
async fn test_duplicate_sibling_names_are_permitted() {
    let gw = TestGateway::new();
    let owner = UserId::new();
    let first = gw.folder(owner, "Docs", None).await;
    let second = gw.folder(owner, "Docs", None).await;
    assert_ne!(first.id, second.id);

    let roots = gw.tree.list_folders(owner, None).await.unwrap();
    assert_eq!(roots.len(), 2);
}

#[tokio::test]
async fn test_blank_folder_name_rejected() {
    let gw = TestGateway::new();
    let err = gw
        .tree
        .create_folder(CreateFolderRequest {
            owner_id: UserId::new(),
            name: "   ".to_string(),
            parent_id: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_store_file_rejects_oversized_upload() {
    let gw = TestGateway::new();
    let err = gw
        .tree
        .store_file(StoreFileRequest {
            owner_id: UserId::new(),
            folder_id: None,
            name: "big.bin".to_string(),
            content_type: "application/octet-stream".to_string(),
            data: Bytes::from(vec![0u8; 5 * 1024 * 1024 + 1]),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(gw.catalog.file_count().await, 0);
}

#[tokio::test]
async fn test_store_file_into_missing_folder() {
    let gw = TestGateway::new();
    let err = gw
        .tree
        .store_file(StoreFileRequest {
            owner_id: UserId::new(),
            folder_id: Some(FolderId::new()),
            name: "a.txt".to_string(),
            content_type: "text/plain".to_string(),
            data: Bytes::from("hello"),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidParent);
}

#[tokio::test]
async fn test_same_name_in_two_folders_aliases_one_blob() {
    let gw = TestGateway::new();
    let owner = UserId::new();
    let docs = gw.folder(owner, "Docs", None).await;
    let pics = gw.folder(owner, "Pics", None).await;

    let first = gw.file(owner, Some(docs.id), "a.txt", "first").await;
    let second = gw.file(owner, Some(pics.id), "a.txt", "second").await;

    // Keys encode (owner, filename) only: both rows point at one blob and
    // the later upload's bytes win. Accepted residual of the key scheme.
    assert_eq!(first.storage_key, second.storage_key);
    let entries = read_archive(gw.archives.assemble(docs.id).await.unwrap()).await;
    assert_eq!(entries[0], ("a.txt".to_string(), b"second".to_vec()));
}

#[tokio::test]
async fn test_delete_file_removes_row_and_blob() {
    let gw = TestGateway::new();
    let owner = UserId::new();
    let file = gw.file(owner, None, "a.txt", "hello").await;

    gw.tree.delete_file(file.id).await.unwrap();

    assert!(gw.catalog.find_file(file.id).await.unwrap().is_none());
    let err = gw.store.get(&file.storage_key).await.map(|_| ()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // Second delete loses the race and observes the row already gone.
    let err = gw.tree.delete_file(file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_folder_is_shallow() {
    let gw = TestGateway::new();
    let owner = UserId::new();
    let docs = gw.folder(owner, "Docs", None).await;
    let sub = gw.folder(owner, "Sub", Some(docs.id)).await;
    let direct = gw.file(owner, Some(docs.id), "a.txt", "direct").await;
    let nested = gw.file(owner, Some(sub.id), "b.txt", "nested").await;

    gw.tree.delete_folder(docs.id).await.unwrap();

    // Direct files are gone from both stores.
    assert!(gw.catalog.find_file(direct.id).await.unwrap().is_none());
    assert!(!gw.store.contains(&direct.storage_key).await);
    assert!(gw.catalog.find_folder(docs.id).await.unwrap().is_none());

    // The subfolder and its file survive, with a dangling parent_id.
    // Accepted behavior of the shallow delete, not a bug.
    let orphan = gw.catalog.find_folder(sub.id).await.unwrap().unwrap();
    assert_eq!(orphan.parent_id, Some(docs.id));
    assert!(gw.catalog.find_file(nested.id).await.unwrap().is_some());
    assert!(gw.store.contains(&nested.storage_key).await);
}

#[tokio::test]
async fn test_delete_folder_succeeds_when_blob_delete_fails() {
    let gw = TestGateway::new();
    let owner = UserId::new();
    let docs = gw.folder(owner, "Docs", None).await;
    let file = gw.file(owner, Some(docs.id), "a.txt", "hello").await;

    // Catalog deletes proceed; blob deletes fail and are accepted.
    gw.store.set_offline(true);
    gw.tree.delete_folder(docs.id).await.unwrap();
    gw.store.set_offline(false);

    assert_eq!(gw.catalog.file_count().await, 0);
    assert_eq!(gw.catalog.folder_count().await, 0);
    // The orphaned blob is a known residual.
    assert!(gw.store.contains(&file.storage_key).await);
}

#[tokio::test]
async fn test_grant_for_root_file_expires() {
    let gw = TestGateway::new();
    let owner = UserId::new();
    gw.file(owner, None, "b.txt", "hello").await;

    let grant = gw.grants.issue_grant_for_name(owner, "b.txt").await.unwrap();
    assert_eq!(grant.expires_in, Duration::from_secs(300));

    let now = Utc::now();
    assert!(gw.store.verify_url(&grant.url, now).await);
    assert!(
        !gw.store
            .verify_url(&grant.url, now + chrono::Duration::seconds(301))
            .await
    );
}

#[tokio::test]
async fn test_repeated_grants_are_independently_valid() {
    let gw = TestGateway::new();
    let owner = UserId::new();
    let file = gw.file(owner, None, "b.txt", "hello").await;

    let ttl = Duration::from_secs(300);
    let first = gw.grants.issue_grant(&file.storage_key, ttl).await.unwrap();
    let second = gw.grants.issue_grant(&file.storage_key, ttl).await.unwrap();

    assert_ne!(first.url, second.url);
    let now = Utc::now();
    assert!(gw.store.verify_url(&first.url, now).await);
    assert!(gw.store.verify_url(&second.url, now).await);
}

#[tokio::test]
async fn test_grant_ttl_bounds() {
    let gw = TestGateway::new();
    let key = StorageKey::new("u/x.txt");

    let err = gw
        .grants
        .issue_grant(&key, Duration::ZERO)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = gw
        .grants
        .issue_grant(&key, MAX_GRANT_TTL + Duration::from_secs(1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_folder_grants_partial_success() {
    let gw = TestGateway::new();
    let owner = UserId::new();
    let docs = gw.folder(owner, "Docs", None).await;
    gw.file(owner, Some(docs.id), "good.txt", "fine").await;
    let bad = gw.file(owner, Some(docs.id), "bad.txt", "doomed").await;

    // Losing one blob must not sink the whole batch.
    gw.store.delete(&bad.storage_key).await.unwrap();

    let grants = gw.grants.issue_grants_for_folder(docs.id).await.unwrap();
    assert_eq!(grants.urls.len(), 1);
    assert_eq!(grants.urls[0].name, "good.txt");
    assert_eq!(grants.failures.len(), 1);
    assert_eq!(grants.failures[0].name, "bad.txt");
}

#[tokio::test]
async fn test_folder_grants_unknown_folder() {
    let gw = TestGateway::new();
    let err = gw
        .grants
        .issue_grants_for_folder(FolderId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_grant_failure_returns_no_url() {
    let gw = TestGateway::new();
    let owner = UserId::new();
    gw.file(owner, None, "a.txt", "hello").await;

    // A rejected signing request surfaces as GrantIssuance; an unreachable
    // store stays a transport failure.
    gw.store.set_fail_signing(true);
    let err = gw.grants.issue_grant_for_name(owner, "a.txt").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::GrantIssuance);
    gw.store.set_fail_signing(false);

    gw.store.set_offline(true);
    let err = gw.grants.issue_grant_for_name(owner, "a.txt").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::StorageUnavailable);
}
