//! Credential service — authorization-scoped CRUD over credentials.
//!
//! Every operation resolves the target's owning division and asks the
//! authorization engine before touching the store. Validation and
//! authorization run before any mutation, so a rejected request leaves
//! no partial writes.

use credvault_core::authz::{Action, Principal, can_access};
use credvault_core::error::{VaultError, VaultResult};
use credvault_core::models::credential::{CreateCredential, Credential, UpdateCredential};
use credvault_core::models::division::Division;
use credvault_core::repository::{
    CredentialRepository, DivisionRepository, PaginatedResult, Pagination,
};
use uuid::Uuid;

/// Minimum credential password length, same policy as user
/// registration.
const MIN_PASSWORD_LENGTH: usize = 6;

pub struct CredentialService<C: CredentialRepository, D: DivisionRepository> {
    credential_repo: C,
    division_repo: D,
}

impl<C: CredentialRepository, D: DivisionRepository> CredentialService<C, D> {
    pub fn new(credential_repo: C, division_repo: D) -> Self {
        Self {
            credential_repo,
            division_repo,
        }
    }

    /// List credentials visible to the principal: everything for
    /// admins, otherwise only the principal's own divisions.
    pub async fn list(
        &self,
        principal: &Principal,
        pagination: Pagination,
    ) -> VaultResult<PaginatedResult<Credential>> {
        if principal.is_admin() {
            return self.credential_repo.list_all(pagination).await;
        }

        let division_ids: Vec<Uuid> = principal.divisions.iter().copied().collect();
        self.credential_repo
            .list_by_divisions(&division_ids, pagination)
            .await
    }

    /// List the credentials of one division (its derived credential
    /// repository), access-checked like a read of each member.
    pub async fn list_for_division(
        &self,
        principal: &Principal,
        division_id: Uuid,
        pagination: Pagination,
    ) -> VaultResult<PaginatedResult<Credential>> {
        // Surface a missing division as NotFound rather than an empty
        // (and misleading) result set.
        let division = self.division_repo.get_by_id(division_id).await?;

        let action = Action::ReadCredential {
            division_id: division.id,
        };
        if !can_access(principal, &action).is_allowed() {
            return Err(VaultError::forbidden(
                "no access to this division's credentials",
            ));
        }

        self.credential_repo
            .list_by_divisions(&[division.id], pagination)
            .await
    }

    pub async fn get(&self, principal: &Principal, id: Uuid) -> VaultResult<Credential> {
        let credential = self.credential_repo.get_by_id(id).await?;

        let action = Action::ReadCredential {
            division_id: credential.division_id,
        };
        if !can_access(principal, &action).is_allowed() {
            return Err(VaultError::forbidden(
                "no permission to view this credential",
            ));
        }

        Ok(credential)
    }

    pub async fn create(
        &self,
        principal: &Principal,
        input: CreateCredential,
    ) -> VaultResult<Credential> {
        let username = input.username.trim().to_string();
        if username.is_empty() {
            return Err(VaultError::validation("username is required"));
        }
        if input.password.len() < MIN_PASSWORD_LENGTH {
            return Err(VaultError::validation(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }

        let division = self.division_repo.get_by_id(input.division_id).await?;

        let action = Action::CreateCredential {
            division_id: division.id,
        };
        if !can_access(principal, &action).is_allowed() {
            return Err(VaultError::forbidden(
                "no permission to add credentials to this division",
            ));
        }

        if self
            .credential_repo
            .find_in_division(division.id, &username)
            .await?
            .is_some()
        {
            return Err(VaultError::DuplicateCredential);
        }

        self.credential_repo
            .create(CreateCredential {
                username,
                password: input.password,
                description: input.description.map(|d| d.trim().to_string()),
                division_id: division.id,
            })
            .await
    }

    pub async fn update(
        &self,
        principal: &Principal,
        id: Uuid,
        input: UpdateCredential,
    ) -> VaultResult<Credential> {
        let credential = self.credential_repo.get_by_id(id).await?;

        let action = Action::UpdateCredential {
            division_id: credential.division_id,
        };
        if !can_access(principal, &action).is_allowed() {
            return Err(VaultError::forbidden(
                "no permission to update this credential",
            ));
        }

        let username = match input.username {
            Some(ref username) => {
                let username = username.trim().to_string();
                if username.is_empty() {
                    return Err(VaultError::validation("username cannot be empty"));
                }
                Some(username)
            }
            None => None,
        };
        if let Some(ref password) = input.password
            && password.len() < MIN_PASSWORD_LENGTH
        {
            return Err(VaultError::validation(format!(
                "password must be at least {MIN_PASSWORD_LENGTH} characters long"
            )));
        }

        // Moving the credential requires access to the new division
        // as well (admins pass unconditionally).
        let target_division = match input.division_id {
            Some(new_division_id) if new_division_id != credential.division_id => {
                let division: Division = self.division_repo.get_by_id(new_division_id).await?;
                let action = Action::CreateCredential {
                    division_id: division.id,
                };
                if !can_access(principal, &action).is_allowed() {
                    return Err(VaultError::forbidden(
                        "no permission to move this credential to the selected division",
                    ));
                }
                division.id
            }
            _ => credential.division_id,
        };

        // Uniqueness must hold for the post-update (username, division)
        // pair whenever either side changes.
        let target_username = username.as_deref().unwrap_or(&credential.username);
        if target_username != credential.username || target_division != credential.division_id {
            let clash = self
                .credential_repo
                .find_in_division(target_division, target_username)
                .await?;
            if clash.is_some_and(|existing| existing.id != credential.id) {
                return Err(VaultError::DuplicateCredential);
            }
        }

        self.credential_repo
            .update(
                credential.id,
                UpdateCredential {
                    username,
                    password: input.password,
                    description: input.description.map(|d| d.trim().to_string()),
                    division_id: input.division_id,
                },
            )
            .await
    }

    pub async fn delete(&self, principal: &Principal, id: Uuid) -> VaultResult<()> {
        let credential = self.credential_repo.get_by_id(id).await?;

        let action = Action::DeleteCredential {
            division_id: credential.division_id,
        };
        if !can_access(principal, &action).is_allowed() {
            return Err(VaultError::forbidden(
                "no permission to delete this credential",
            ));
        }

        self.credential_repo.delete(credential.id).await
    }
}
