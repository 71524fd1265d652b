//! Application state shared by all request handlers.
//!
//! Generic over the SurrealDB connection type so the same router runs
//! against the remote engine in production and the embedded in-memory
//! engine in tests.

use std::sync::Arc;

use credvault_auth::{AuthConfig, AuthService};
use credvault_db::repository::{
    SurrealCredentialRepository, SurrealDivisionRepository, SurrealOrgUnitRepository,
    SurrealUserRepository,
};
use credvault_service::{AssignmentService, CredentialService, DirectoryService};
use surrealdb::{Connection, Surreal};

pub type UserRepo<C> = SurrealUserRepository<C>;
pub type OrgUnitRepo<C> = SurrealOrgUnitRepository<C>;
pub type DivisionRepo<C> = SurrealDivisionRepository<C>;
pub type CredentialRepo<C> = SurrealCredentialRepository<C>;

pub struct AppState<C: Connection> {
    pub auth: Arc<AuthService<UserRepo<C>>>,
    pub credentials: Arc<CredentialService<CredentialRepo<C>, DivisionRepo<C>>>,
    pub assignments: Arc<AssignmentService<UserRepo<C>, DivisionRepo<C>, OrgUnitRepo<C>>>,
    pub directory: Arc<DirectoryService<OrgUnitRepo<C>, DivisionRepo<C>, CredentialRepo<C>>>,
    /// Direct repository handle for user lookups that fall outside
    /// the services (current-user loads, admin listings).
    pub users: UserRepo<C>,
}

// Manual Clone: `C` itself need not be Clone for the Arc'd services.
impl<C: Connection> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            auth: self.auth.clone(),
            credentials: self.credentials.clone(),
            assignments: self.assignments.clone(),
            directory: self.directory.clone(),
            users: self.users.clone(),
        }
    }
}

impl<C: Connection> AppState<C> {
    /// Wire up repositories and services over one database handle.
    pub fn new(db: Surreal<C>, auth_config: AuthConfig) -> Self {
        let user_repo = match auth_config.pepper.clone() {
            Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper),
            None => SurrealUserRepository::new(db.clone()),
        };
        let credential_repo = match auth_config.pepper.clone() {
            Some(pepper) => SurrealCredentialRepository::with_pepper(db.clone(), pepper),
            None => SurrealCredentialRepository::new(db.clone()),
        };
        let division_repo = SurrealDivisionRepository::new(db.clone());
        let ou_repo = SurrealOrgUnitRepository::new(db.clone());

        Self {
            auth: Arc::new(AuthService::new(user_repo.clone(), auth_config)),
            credentials: Arc::new(CredentialService::new(
                credential_repo.clone(),
                division_repo.clone(),
            )),
            assignments: Arc::new(AssignmentService::new(
                user_repo.clone(),
                division_repo.clone(),
                ou_repo.clone(),
            )),
            directory: Arc::new(DirectoryService::new(
                ou_repo,
                division_repo,
                credential_repo,
            )),
            users: user_repo,
        }
    }
}
