//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations must provide
//! atomic single-document writes; the assignment operations on
//! [`UserRepository`] are required to use store-side set semantics
//! (add-if-absent / remove) so that concurrent assignments cannot lose
//! updates.

use uuid::Uuid;

use crate::error::VaultResult;
use crate::models::{
    credential::{CreateCredential, Credential, UpdateCredential},
    division::{CreateDivision, Division},
    org_unit::{CreateOrgUnit, OrgUnit},
    user::{CreateUser, Role, User, UserStatus},
};

/// Pagination parameters for list queries.
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

pub trait UserRepository: Send + Sync {
    /// Insert a new user with role `normal`, active status, and no
    /// assignments. The raw password is hashed before storage.
    fn create(&self, input: CreateUser) -> impl Future<Output = VaultResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VaultResult<User>> + Send;
    fn get_by_username(&self, username: &str) -> impl Future<Output = VaultResult<User>> + Send;
    fn list(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = VaultResult<PaginatedResult<User>>> + Send;
    fn set_role(&self, id: Uuid, role: Role) -> impl Future<Output = VaultResult<User>> + Send;
    fn set_status(
        &self,
        id: Uuid,
        status: UserStatus,
    ) -> impl Future<Output = VaultResult<User>> + Send;
    /// Add a division to the user's set if absent (atomic).
    fn add_division(
        &self,
        user_id: Uuid,
        division_id: Uuid,
    ) -> impl Future<Output = VaultResult<User>> + Send;
    /// Remove a division from the user's set (atomic).
    fn remove_division(
        &self,
        user_id: Uuid,
        division_id: Uuid,
    ) -> impl Future<Output = VaultResult<User>> + Send;
    /// Add a directly-assigned organisational unit if absent (atomic).
    fn add_ou(&self, user_id: Uuid, ou_id: Uuid)
    -> impl Future<Output = VaultResult<User>> + Send;
    /// Remove a directly-assigned organisational unit (atomic).
    fn remove_ou(
        &self,
        user_id: Uuid,
        ou_id: Uuid,
    ) -> impl Future<Output = VaultResult<User>> + Send;
}

pub trait OrgUnitRepository: Send + Sync {
    fn create(&self, input: CreateOrgUnit) -> impl Future<Output = VaultResult<OrgUnit>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VaultResult<OrgUnit>> + Send;
    fn get_by_name(&self, name: &str) -> impl Future<Output = VaultResult<Option<OrgUnit>>> + Send;
    fn list(&self) -> impl Future<Output = VaultResult<Vec<OrgUnit>>> + Send;
    fn list_by_ids(&self, ids: &[Uuid]) -> impl Future<Output = VaultResult<Vec<OrgUnit>>> + Send;
}

pub trait DivisionRepository: Send + Sync {
    fn create(&self, input: CreateDivision) -> impl Future<Output = VaultResult<Division>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VaultResult<Division>> + Send;
    fn list(&self) -> impl Future<Output = VaultResult<Vec<Division>>> + Send;
    fn list_by_ids(&self, ids: &[Uuid]) -> impl Future<Output = VaultResult<Vec<Division>>> + Send;
    /// Divisions owned by an organisational unit.
    fn list_by_ou(&self, ou_id: Uuid) -> impl Future<Output = VaultResult<Vec<Division>>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = VaultResult<()>> + Send;
}

pub trait CredentialRepository: Send + Sync {
    /// Insert a new credential. The raw password is hashed before
    /// storage.
    fn create(&self, input: CreateCredential)
    -> impl Future<Output = VaultResult<Credential>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VaultResult<Credential>> + Send;
    fn list_all(
        &self,
        pagination: Pagination,
    ) -> impl Future<Output = VaultResult<PaginatedResult<Credential>>> + Send;
    fn list_by_divisions(
        &self,
        division_ids: &[Uuid],
        pagination: Pagination,
    ) -> impl Future<Output = VaultResult<PaginatedResult<Credential>>> + Send;
    /// Look up a credential by (username, division) for uniqueness
    /// checks.
    fn find_in_division(
        &self,
        division_id: Uuid,
        username: &str,
    ) -> impl Future<Output = VaultResult<Option<Credential>>> + Send;
    /// Partial update; a supplied raw password is re-hashed.
    fn update(
        &self,
        id: Uuid,
        input: UpdateCredential,
    ) -> impl Future<Output = VaultResult<Credential>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = VaultResult<()>> + Send;
    /// Delete every credential owned by a division (cascade path).
    fn delete_by_division(&self, division_id: Uuid) -> impl Future<Output = VaultResult<u64>> + Send;
}
