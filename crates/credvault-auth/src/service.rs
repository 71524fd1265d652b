//! Authentication service — registration, login, and per-request
//! principal resolution.

use credvault_core::authz::Principal;
use credvault_core::error::{VaultError, VaultResult};
use credvault_core::models::user::{CreateUser, User, UserStatus};
use credvault_core::repository::UserRepository;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Successful registration or login result.
#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    /// Signed JWT access token.
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: u64,
}

/// Authentication service.
///
/// Generic over the repository implementation so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U: UserRepository> {
    user_repo: U,
    config: AuthConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: U, config: AuthConfig) -> Self {
        Self { user_repo, config }
    }

    /// Register a new user with role `normal` and no assignments, and
    /// issue an access token.
    pub async fn register(&self, username: &str, password: &str) -> VaultResult<LoginOutput> {
        let username = username.trim();
        if username.len() < self.config.min_username_length {
            return Err(VaultError::validation(format!(
                "username must be at least {} characters long",
                self.config.min_username_length
            )));
        }
        if password.len() < self.config.min_password_length {
            return Err(VaultError::validation(format!(
                "password must be at least {} characters long",
                self.config.min_password_length
            )));
        }

        // Uniqueness check before the insert; the unique index backs
        // this up against races.
        match self.user_repo.get_by_username(username).await {
            Ok(_) => {
                return Err(VaultError::AlreadyExists {
                    entity: "user".into(),
                });
            }
            Err(VaultError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let user = self
            .user_repo
            .create(CreateUser {
                username: username.to_string(),
                password: password.to_string(),
            })
            .await?;

        let access_token = token::issue_access_token(user.id, &self.config)?;

        Ok(LoginOutput {
            user,
            access_token,
            expires_in: self.config.access_token_lifetime_secs,
        })
    }

    /// Authenticate a user with username + password and issue a token.
    pub async fn login(&self, username: &str, password: &str) -> VaultResult<LoginOutput> {
        let user = self
            .user_repo
            .get_by_username(username.trim())
            .await
            .map_err(|e| match e {
                VaultError::NotFound { .. } => AuthError::InvalidCredentials.into(),
                other => other,
            })?;

        let valid = password::verify_password(
            password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        if user.status == UserStatus::Inactive {
            return Err(AuthError::AccountInactive.into());
        }

        let access_token = token::issue_access_token(user.id, &self.config)?;

        Ok(LoginOutput {
            user,
            access_token,
            expires_in: self.config.access_token_lifetime_secs,
        })
    }

    /// Resolve a bearer token to a fresh principal snapshot.
    ///
    /// Validates the token, then re-reads the user so the snapshot
    /// reflects current role and division assignments rather than
    /// whatever was true at issue time. The snapshot is trusted
    /// verbatim for the duration of one request.
    pub async fn resolve_principal(&self, bearer_token: &str) -> VaultResult<Principal> {
        let claims = token::validate_access_token(bearer_token, &self.config)?;

        let user_id = Uuid::parse_str(&claims.0.sub)
            .map_err(|e| AuthError::TokenInvalid(format!("bad subject: {e}")))?;

        let user = self
            .user_repo
            .get_by_id(user_id)
            .await
            .map_err(|e| match e {
                VaultError::NotFound { .. } => {
                    AuthError::TokenInvalid("user no longer exists".into()).into()
                }
                other => other,
            })?;

        if user.status == UserStatus::Inactive {
            return Err(VaultError::forbidden("account is inactive"));
        }

        Ok(Principal::from(&user))
    }
}
