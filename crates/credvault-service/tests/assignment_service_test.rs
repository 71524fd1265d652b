//! Integration tests for the assignment manager using in-memory
//! SurrealDB.

use std::collections::HashSet;

use credvault_core::authz::Principal;
use credvault_core::error::VaultError;
use credvault_core::models::user::{CreateUser, Role, User};
use credvault_core::repository::UserRepository;
use credvault_db::repository::{
    SurrealCredentialRepository, SurrealDivisionRepository, SurrealOrgUnitRepository,
    SurrealUserRepository,
};
use credvault_service::{AssignmentService, DirectoryService};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

type TestAssignmentService = AssignmentService<
    SurrealUserRepository<Db>,
    SurrealDivisionRepository<Db>,
    SurrealOrgUnitRepository<Db>,
>;
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

fn non_admin(role: Role) -> Principal {
    Principal {
        user_id: Uuid::new_v4(),
        role,
        divisions: HashSet::new(),
    }
}

async fn setup() -> (
    Surreal<Db>,
    TestAssignmentService,
    TestDirectoryService,
    User,
) {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    credvault_db::run_migrations(&db).await.unwrap();

    let assignments = AssignmentService::new(
        SurrealUserRepository::new(db.clone()),
        SurrealDivisionRepository::new(db.clone()),
        SurrealOrgUnitRepository::new(db.clone()),
    );
    let directory = DirectoryService::new(
        SurrealOrgUnitRepository::new(db.clone()),
        SurrealDivisionRepository::new(db.clone()),
        SurrealCredentialRepository::new(db.clone()),
    );

    let user = SurrealUserRepository::new(db.clone())
        .create(CreateUser {
            username: "alice".into(),
            password: "abcdef".into(),
        })
        .await
        .unwrap();

    (db, assignments, directory, user)
}

#[tokio::test]
async fn assign_then_unassign_division_round_trips() {
    let (_db, assignments, directory, user) = setup().await;
    let root = admin();

    let ou = directory.create_ou(&root, "News").await.unwrap();
    let division = directory
        .create_division(&root, "News Div 1", ou.id)
        .await
        .unwrap();

    let after_assign = assignments
        .assign_division(&root, user.id, division.id)
        .await
        .unwrap();
    assert!(after_assign.divisions.contains(&division.id));

    let after_unassign = assignments
        .unassign_division(&root, user.id, division.id)
        .await
        .unwrap();
    assert!(!after_unassign.divisions.contains(&division.id));
}

#[tokio::test]
async fn double_assign_conflicts_and_leaves_state_unchanged() {
    let (_db, assignments, directory, user) = setup().await;
    let root = admin();

    let ou = directory.create_ou(&root, "News").await.unwrap();
    let division = directory
        .create_division(&root, "News Div 1", ou.id)
        .await
        .unwrap();

    assignments
        .assign_division(&root, user.id, division.id)
        .await
        .unwrap();

    let err = assignments
        .assign_division(&root, user.id, division.id)
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::AlreadyAssigned { .. }));

    // The failed call must not have touched the list.
    let repo = SurrealUserRepository::new(_db);
    let fresh = repo.get_by_id(user.id).await.unwrap();
    assert_eq!(fresh.divisions, vec![division.id]);
}

#[tokio::test]
async fn unassign_without_assignment_conflicts() {
    let (_db, assignments, directory, user) = setup().await;
    let root = admin();

    let ou = directory.create_ou(&root, "News").await.unwrap();
    let division = directory
        .create_division(&root, "News Div 1", ou.id)
        .await
        .unwrap();

    let err = assignments
        .unassign_division(&root, user.id, division.id)
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::NotAssigned { .. }));
}

#[tokio::test]
async fn assign_missing_user_or_division_is_not_found() {
    let (_db, assignments, directory, user) = setup().await;
    let root = admin();

    let err = assignments
        .assign_division(&root, user.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::NotFound { .. }));

    let ou = directory.create_ou(&root, "News").await.unwrap();
    let division = directory
        .create_division(&root, "News Div 1", ou.id)
        .await
        .unwrap();
    let err = assignments
        .assign_division(&root, Uuid::new_v4(), division.id)
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::NotFound { .. }));
}

#[tokio::test]
async fn assignments_are_admin_only() {
    let (_db, assignments, directory, user) = setup().await;
    let root = admin();

    let ou = directory.create_ou(&root, "News").await.unwrap();
    let division = directory
        .create_division(&root, "News Div 1", ou.id)
        .await
        .unwrap();

    for role in [Role::Normal, Role::Management] {
        let err = assignments
            .assign_division(&non_admin(role), user.id, division.id)
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::Forbidden { .. }));
    }
}

#[tokio::test]
async fn ou_assignment_round_trips() {
    let (_db, assignments, directory, user) = setup().await;
    let root = admin();

    let ou = directory.create_ou(&root, "Hardware reviews").await.unwrap();

    let after_assign = assignments.assign_ou(&root, user.id, ou.id).await.unwrap();
    assert!(after_assign.ous.contains(&ou.id));

    let err = assignments
        .assign_ou(&root, user.id, ou.id)
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::AlreadyAssigned { .. }));

    let after_unassign = assignments
        .unassign_ou(&root, user.id, ou.id)
        .await
        .unwrap();
    assert!(after_unassign.ous.is_empty());

    let err = assignments
        .unassign_ou(&root, user.id, ou.id)
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::NotAssigned { .. }));
}

#[tokio::test]
async fn change_role_validates_and_applies() {
    let (_db, assignments, _directory, user) = setup().await;
    let root = admin();

    let err = assignments
        .change_role(&root, user.id, "superuser")
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::Validation { .. }));

    let updated = assignments
        .change_role(&root, user.id, "management")
        .await
        .unwrap();
    assert_eq!(updated.role, Role::Management);

    let err = assignments
        .change_role(&non_admin(Role::Management), user.id, "admin")
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::Forbidden { .. }));

    let err = assignments
        .change_role(&root, Uuid::new_v4(), "normal")
        .await
        .unwrap_err();
    assert!(matches!(err, VaultError::NotFound { .. }));
}

#[tokio::test]
async fn visible_ous_is_the_union_of_direct_and_division_derived() {
    let (db, assignments, directory, user) = setup().await;
    let root = admin();

    // OU_A assigned directly; OU_B reached through Div1 membership.
    let ou_a = directory.create_ou(&root, "Opinion publishing").await.unwrap();
    let ou_b = directory.create_ou(&root, "News management").await.unwrap();
    let div1 = directory
        .create_division(&root, "News Div 1", ou_b.id)
        .await
        .unwrap();

    assignments.assign_ou(&root, user.id, ou_a.id).await.unwrap();
    assignments
        .assign_division(&root, user.id, div1.id)
        .await
        .unwrap();

    let repo = SurrealUserRepository::new(db);
    let fresh = repo.get_by_id(user.id).await.unwrap();

    let visible = assignments.visible_ous(&fresh).await.unwrap();
    let visible_ids: Vec<Uuid> = visible.iter().map(|ou| ou.id).collect();
    assert_eq!(visible.len(), 2);
    assert!(visible_ids.contains(&ou_a.id));
    assert!(visible_ids.contains(&ou_b.id));
}

#[tokio::test]
async fn visible_ous_deduplicates_overlap() {
    let (db, assignments, directory, user) = setup().await;
    let root = admin();

    // The same OU both directly assigned and reached via a division.
    let ou = directory.create_ou(&root, "News management").await.unwrap();
    let div = directory
        .create_division(&root, "News Div 1", ou.id)
        .await
        .unwrap();

    assignments.assign_ou(&root, user.id, ou.id).await.unwrap();
    assignments
        .assign_division(&root, user.id, div.id)
        .await
        .unwrap();

    let repo = SurrealUserRepository::new(db);
    let fresh = repo.get_by_id(user.id).await.unwrap();

    let visible = assignments.visible_ous(&fresh).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, ou.id);
}
