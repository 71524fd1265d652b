//! Directory service — provisioning of organisational units and
//! divisions.
//!
//! Mutations ride the admin-only assignment rule of the authorization
//! engine; listing is left to the caller's route-level scoping.

use credvault_core::authz::{Action, Principal, can_access};
use credvault_core::error::{VaultError, VaultResult};
use credvault_core::models::division::{CreateDivision, Division};
use credvault_core::models::org_unit::{CreateOrgUnit, OrgUnit};
use credvault_core::repository::{CredentialRepository, DivisionRepository, OrgUnitRepository};
use uuid::Uuid;

/// Minimum name length for organisational units and divisions.
const MIN_NAME_LENGTH: usize = 3;

pub struct DirectoryService<O, D, C>
where
    O: OrgUnitRepository,
    D: DivisionRepository,
    C: CredentialRepository,
{
    ou_repo: O,
    division_repo: D,
    credential_repo: C,
}

impl<O, D, C> DirectoryService<O, D, C>
where
    O: OrgUnitRepository,
    D: DivisionRepository,
    C: CredentialRepository,
{
    pub fn new(ou_repo: O, division_repo: D, credential_repo: C) -> Self {
        Self {
            ou_repo,
            division_repo,
            credential_repo,
        }
    }

    fn require_admin(principal: &Principal) -> VaultResult<()> {
        if can_access(principal, &Action::Assign).is_allowed() {
            Ok(())
        } else {
            Err(VaultError::forbidden("directory changes are admin-only"))
        }
    }

    fn validate_name(name: &str, what: &str) -> VaultResult<String> {
        let name = name.trim();
        if name.len() < MIN_NAME_LENGTH {
            return Err(VaultError::validation(format!(
                "{what} name must be at least {MIN_NAME_LENGTH} characters long"
            )));
        }
        Ok(name.to_string())
    }

    pub async fn create_ou(&self, principal: &Principal, name: &str) -> VaultResult<OrgUnit> {
        Self::require_admin(principal)?;
        let name = Self::validate_name(name, "organisational unit")?;

        if self.ou_repo.get_by_name(&name).await?.is_some() {
            return Err(VaultError::AlreadyExists {
                entity: "organisational unit".into(),
            });
        }

        self.ou_repo.create(CreateOrgUnit { name }).await
    }

    pub async fn create_division(
        &self,
        principal: &Principal,
        name: &str,
        ou_id: Uuid,
    ) -> VaultResult<Division> {
        Self::require_admin(principal)?;
        let name = Self::validate_name(name, "division")?;

        // The owning OU must exist before the division can reference it.
        let ou = self.ou_repo.get_by_id(ou_id).await?;

        self.division_repo
            .create(CreateDivision { name, ou_id: ou.id })
            .await
    }

    /// Delete a division and cascade-delete its credentials.
    ///
    /// Orphaned credentials would be unreachable under the access
    /// model (their division can never appear in a membership set
    /// again), so the cascade removes them outright. Returns the
    /// number of credentials removed.
    pub async fn delete_division(&self, principal: &Principal, id: Uuid) -> VaultResult<u64> {
        Self::require_admin(principal)?;

        let division = self.division_repo.get_by_id(id).await?;

        let removed = self
            .credential_repo
            .delete_by_division(division.id)
            .await?;
        self.division_repo.delete(division.id).await?;

        Ok(removed)
    }

    pub async fn list_ous(&self) -> VaultResult<Vec<OrgUnit>> {
        self.ou_repo.list().await
    }

    pub async fn list_divisions(&self) -> VaultResult<Vec<Division>> {
        self.division_repo.list().await
    }

    /// The divisions owned by an organisational unit, derived from
    /// the owning foreign key.
    pub async fn divisions_of_ou(&self, ou_id: Uuid) -> VaultResult<Vec<Division>> {
        let ou = self.ou_repo.get_by_id(ou_id).await?;
        self.division_repo.list_by_ou(ou.id).await
    }

    /// The divisions a user is assigned to, resolved to full records.
    pub async fn divisions_by_ids(&self, ids: &[Uuid]) -> VaultResult<Vec<Division>> {
        self.division_repo.list_by_ids(ids).await
    }
}
