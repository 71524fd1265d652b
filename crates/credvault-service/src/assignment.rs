//! Assignment manager — user↔division and user↔OU membership plus
//! role changes.
//!
//! Membership mutations are admin-only and delegate the decision to
//! the authorization engine. State conflicts (assigning twice,
//! unassigning something never assigned) are detected against a fresh
//! read and reported as conflict errors; the store-side update itself
//! uses set semantics, so a concurrent duplicate assign cannot corrupt
//! the list either.

use credvault_core::authz::{Action, Principal, can_access};
use credvault_core::error::{VaultError, VaultResult};
use credvault_core::models::org_unit::OrgUnit;
use credvault_core::models::user::{Role, User};
use credvault_core::repository::{DivisionRepository, OrgUnitRepository, UserRepository};
use uuid::Uuid;

pub struct AssignmentService<U, D, O>
where
    U: UserRepository,
    D: DivisionRepository,
    O: OrgUnitRepository,
{
    user_repo: U,
    division_repo: D,
    ou_repo: O,
}

impl<U, D, O> AssignmentService<U, D, O>
where
    U: UserRepository,
    D: DivisionRepository,
    O: OrgUnitRepository,
{
    pub fn new(user_repo: U, division_repo: D, ou_repo: O) -> Self {
        Self {
            user_repo,
            division_repo,
            ou_repo,
        }
    }

    fn require_assign(principal: &Principal) -> VaultResult<()> {
        if can_access(principal, &Action::Assign).is_allowed() {
            Ok(())
        } else {
            Err(VaultError::forbidden("assignments are admin-only"))
        }
    }

    pub async fn assign_division(
        &self,
        principal: &Principal,
        user_id: Uuid,
        division_id: Uuid,
    ) -> VaultResult<User> {
        Self::require_assign(principal)?;

        let user = self.user_repo.get_by_id(user_id).await?;
        self.division_repo.get_by_id(division_id).await?;

        if user.divisions.contains(&division_id) {
            return Err(VaultError::AlreadyAssigned {
                target: "division".into(),
            });
        }

        self.user_repo.add_division(user_id, division_id).await
    }

    pub async fn unassign_division(
        &self,
        principal: &Principal,
        user_id: Uuid,
        division_id: Uuid,
    ) -> VaultResult<User> {
        Self::require_assign(principal)?;

        let user = self.user_repo.get_by_id(user_id).await?;
        if !user.divisions.contains(&division_id) {
            return Err(VaultError::NotAssigned {
                target: "division".into(),
            });
        }

        self.user_repo.remove_division(user_id, division_id).await
    }

    pub async fn assign_ou(
        &self,
        principal: &Principal,
        user_id: Uuid,
        ou_id: Uuid,
    ) -> VaultResult<User> {
        Self::require_assign(principal)?;

        let user = self.user_repo.get_by_id(user_id).await?;
        self.ou_repo.get_by_id(ou_id).await?;

        if user.ous.contains(&ou_id) {
            return Err(VaultError::AlreadyAssigned {
                target: "organisational unit".into(),
            });
        }

        self.user_repo.add_ou(user_id, ou_id).await
    }

    pub async fn unassign_ou(
        &self,
        principal: &Principal,
        user_id: Uuid,
        ou_id: Uuid,
    ) -> VaultResult<User> {
        Self::require_assign(principal)?;

        let user = self.user_repo.get_by_id(user_id).await?;
        if !user.ous.contains(&ou_id) {
            return Err(VaultError::NotAssigned {
                target: "organisational unit".into(),
            });
        }

        self.user_repo.remove_ou(user_id, ou_id).await
    }

    /// Overwrite a user's role. No side effects on assignments.
    pub async fn change_role(
        &self,
        principal: &Principal,
        user_id: Uuid,
        role: &str,
    ) -> VaultResult<User> {
        if !can_access(principal, &Action::ChangeRole).is_allowed() {
            return Err(VaultError::forbidden("role changes are admin-only"));
        }

        let role: Role = role.parse()?;
        // Existence check so a bad id reports NotFound, not a silent
        // no-op update.
        self.user_repo.get_by_id(user_id).await?;

        self.user_repo.set_role(user_id, role).await
    }

    /// The organisational units visible to a user: the union of the
    /// directly assigned set and the OUs reached through division
    /// membership, deduplicated by id. Either side alone is
    /// incomplete.
    pub async fn visible_ous(&self, user: &User) -> VaultResult<Vec<OrgUnit>> {
        let divisions = self.division_repo.list_by_ids(&user.divisions).await?;

        let mut ou_ids: Vec<Uuid> = user.ous.clone();
        for division in &divisions {
            if !ou_ids.contains(&division.ou_id) {
                ou_ids.push(division.ou_id);
            }
        }

        self.ou_repo.list_by_ids(&ou_ids).await
    }
}
