//! Integration tests for the directory service using in-memory
//! SurrealDB.

use std::collections::HashSet;

use credvault_core::authz::Principal;
use credvault_core::error::VaultError;
use credvault_core::models::credential::CreateCredential;
use credvault_core::models::user::Role;
use credvault_core::repository::{CredentialRepository, Pagination};
use credvault_db::repository::{
    SurrealCredentialRepository, SurrealDivisionRepository, SurrealOrgUnitRepository,
};
use credvault_service::DirectoryService;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type TestDirectoryService = DirectoryService<
    SurrealOrgUnitRepository<Db>,
    SurrealDivisionRepository<Db>,
    SurrealCredentialRepository<Db>,
>;

fn admin() -> Principal {
    Principal {
        user_id: Uuid::new_v4(),
        role: Role::Admin,
        divisions: HashSet::new(),
    }
}

async fn setup() -> (Surreal<Db>, TestDirectoryService) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    credvault_db::run_migrations(&db).await.unwrap();

    let directory = DirectoryService::new(
        SurrealOrgUnitRepository::new(db.clone()),
        SurrealDivisionRepository::new(db.clone()),
        SurrealCredentialRepository::new(db.clone()),
    );
    (db, directory)
}

#[tokio::test]
async fn create_ou_validates_name_and_uniqueness() {
    let (_db, directory) = setup().await;
    let root = admin();

    let err = directory.create_ou(&root, "ab").await.unwrap_err();
    assert!(matches!(err, VaultError::Validation { .. }));

    directory.create_ou(&root, "News management").await.unwrap();
    let err = directory
        .create_ou(&root, "News management")
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::AlreadyExists { .. }));
}

#[tokio::test]
async fn create_division_requires_an_existing_ou() {
    let (_db, directory) = setup().await;
    let root = admin();

    let err = directory
        .create_division(&root, "News Div 1", Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::NotFound { .. }));

    let ou = directory.create_ou(&root, "News management").await.unwrap();
    let err = directory
        .create_division(&root, "ab", ou.id)
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::Validation { .. }));

    let division = directory
        .create_division(&root, "News Div 1", ou.id)
        .await
        .unwrap();
    assert_eq!(division.ou_id, ou.id);

    let listed = directory.divisions_of_ou(ou.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, division.id);
}

#[tokio::test]
async fn mutations_are_admin_only() {
    let (_db, directory) = setup().await;

    for role in [Role::Normal, Role::Management] {
        let principal = Principal {
            user_id: Uuid::new_v4(),
            role,
            divisions: HashSet::new(),
        };
        let err = directory
            .create_ou(&principal, "News management")
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::Forbidden { .. }));
    }
}

#[tokio::test]
async fn delete_division_cascades_to_credentials() {
    let (db, directory) = setup().await;
    let root = admin();

    let ou = directory.create_ou(&root, "News management").await.unwrap();
    let doomed = directory
        .create_division(&root, "News Div 1", ou.id)
        .await
        .unwrap();
    let survivor = directory
        .create_division(&root, "News Div 2", ou.id)
        .await
        .unwrap();

    let credential_repo = SurrealCredentialRepository::new(db);
    for (name, division_id) in [("a", doomed.id), ("b", doomed.id), ("c", survivor.id)] {
        credential_repo
            .create(CreateCredential {
                username: name.into(),
                password: "abcdef".into(),
                description: None,
                division_id,
            })
            .await
            .unwrap();
    }

    let removed = directory.delete_division(&root, doomed.id).await.unwrap();
    assert_eq!(removed, 2);

    // The division is gone, its credentials are gone, the neighbor's
    // credential is untouched.
    let err = directory.divisions_of_ou(ou.id).await.map(|d| d.len());
    assert_eq!(err.unwrap(), 1);

    let remaining = credential_repo.list_all(Pagination::default()).await.unwrap();
    assert_eq!(remaining.total, 1);
    assert_eq!(remaining.items[0].division_id, survivor.id);
}

#[tokio::test]
async fn delete_missing_division_is_not_found() {
    let (_db, directory) = setup().await;

    let err = directory
        .delete_division(&admin(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::NotFound { .. }));
}
