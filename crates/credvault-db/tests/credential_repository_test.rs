//! Integration tests for the Credential repository using in-memory
//! SurrealDB.

use credvault_core::error::VaultError;
use credvault_core::models::credential::{CreateCredential, UpdateCredential};
use credvault_core::repository::{CredentialRepository, Pagination};
use credvault_db::repository::SurrealCredentialRepository;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

async fn setup() -> Surreal<surrealdb::engine::local::Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    credvault_db::run_migrations(&db).await.unwrap();
    db
}

#[tokio::test]
async fn create_hashes_the_password() {
    let db = setup().await;
    let repo = SurrealCredentialRepository::new(db);
    let division_id = Uuid::new_v4();

    let credential = repo
        .create(CreateCredential {
            username: "svc1".into(),
            password: "abcdef".into(),
            description: Some("build server account".into()),
            division_id,
        })
        .await
        .unwrap();

    assert_eq!(credential.username, "svc1");
    assert_eq!(credential.division_id, division_id);
    assert_ne!(credential.password_hash, "abcdef");
    assert!(credential.password_hash.starts_with("$argon2id$"));

    let fetched = repo.get_by_id(credential.id).await.unwrap();
    assert_eq!(fetched.id, credential.id);
    assert_ne!(fetched.password_hash, "abcdef");
}

#[tokio::test]
async fn find_in_division_matches_username_and_division() {
    let db = setup().await;
    let repo = SurrealCredentialRepository::new(db);
    let d1 = Uuid::new_v4();
    let d2 = Uuid::new_v4();

    repo.create(CreateCredential {
        username: "svc1".into(),
        password: "abcdef".into(),
        description: None,
        division_id: d1,
    })
    .await
    .unwrap();

    assert!(repo.find_in_division(d1, "svc1").await.unwrap().is_some());
    // Same username in another division is a different credential.
    assert!(repo.find_in_division(d2, "svc1").await.unwrap().is_none());
    assert!(repo.find_in_division(d1, "other").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_username_within_division_is_rejected_by_index() {
    let db = setup().await;
    let repo = SurrealCredentialRepository::new(db);
    let division_id = Uuid::new_v4();

    repo.create(CreateCredential {
        username: "svc1".into(),
        password: "abcdef".into(),
        description: None,
        division_id,
    })
    .await
    .unwrap();

    let dup = repo
        .create(CreateCredential {
            username: "svc1".into(),
            password: "ghijkl".into(),
            description: None,
            division_id,
        })
        .await;
    assert!(dup.is_err());
}

#[tokio::test]
async fn list_by_divisions_filters() {
    let db = setup().await;
    let repo = SurrealCredentialRepository::new(db);
    let d1 = Uuid::new_v4();
    let d2 = Uuid::new_v4();
    let d3 = Uuid::new_v4();

    for (name, division_id) in [("a", d1), ("b", d2), ("c", d3)] {
        repo.create(CreateCredential {
            username: name.into(),
            password: "abcdef".into(),
            description: None,
            division_id,
        })
        .await
        .unwrap();
    }

    let page = repo
        .list_by_divisions(&[d1, d2], Pagination::default())
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 2);
    assert!(page.items.iter().all(|c| c.division_id != d3));

    let all = repo.list_all(Pagination::default()).await.unwrap();
    assert_eq!(all.total, 3);
}

#[tokio::test]
async fn update_is_partial_and_rehashes_password() {
    let db = setup().await;
    let repo = SurrealCredentialRepository::new(db);
    let division_id = Uuid::new_v4();

    let credential = repo
        .create(CreateCredential {
            username: "svc1".into(),
            password: "abcdef".into(),
            description: Some("original".into()),
            division_id,
        })
        .await
        .unwrap();
    let original_hash = credential.password_hash.clone();

    let updated = repo
        .update(
            credential.id,
            UpdateCredential {
                password: Some("newpassword".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    // Omitted fields retain prior values.
    assert_eq!(updated.username, "svc1");
    assert_eq!(updated.description.as_deref(), Some("original"));
    assert_eq!(updated.division_id, division_id);
    // The supplied password is re-hashed, never stored raw.
    assert_ne!(updated.password_hash, original_hash);
    assert_ne!(updated.password_hash, "newpassword");
}

#[tokio::test]
async fn update_missing_credential_is_not_found() {
    let db = setup().await;
    let repo = SurrealCredentialRepository::new(db);

    let err = repo
        .update(
            Uuid::new_v4(),
            UpdateCredential {
                username: Some("x".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::NotFound { .. }));
}

#[tokio::test]
async fn delete_by_division_cascades() {
    let db = setup().await;
    let repo = SurrealCredentialRepository::new(db);
    let d1 = Uuid::new_v4();
    let d2 = Uuid::new_v4();

    for name in ["a", "b"] {
        repo.create(CreateCredential {
            username: name.into(),
            password: "abcdef".into(),
            description: None,
            division_id: d1,
        })
        .await
        .unwrap();
    }
    let survivor = repo
        .create(CreateCredential {
            username: "c".into(),
            password: "abcdef".into(),
            description: None,
            division_id: d2,
        })
        .await
        .unwrap();

    let removed = repo.delete_by_division(d1).await.unwrap();
    assert_eq!(removed, 2);

    let remaining = repo.list_all(Pagination::default()).await.unwrap();
    assert_eq!(remaining.total, 1);
    assert_eq!(remaining.items[0].id, survivor.id);
}
