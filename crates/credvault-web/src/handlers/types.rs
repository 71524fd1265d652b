//! Response DTOs and shared query types.
//!
//! Users and credentials get dedicated response types so the password
//! hash can never leak into a serialized body. Divisions and
//! organisational units carry no secrets and serialize as-is.

use chrono::{DateTime, Utc};
use credvault_core::models::credential::Credential;
use credvault_core::models::user::{Role, User, UserStatus};
use credvault_core::repository::Pagination;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user as returned to API clients — everything except the hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub divisions: Vec<Uuid>,
    pub ous: Vec<Uuid>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            divisions: user.divisions,
            ous: user.ous,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// A credential as returned to API clients. The stored hash is
/// deliberately absent: it is persistence detail, not payload.
#[derive(Debug, Serialize)]
pub struct CredentialResponse {
    pub id: Uuid,
    pub username: String,
    pub description: Option<String>,
    pub division_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Credential> for CredentialResponse {
    fn from(credential: Credential) -> Self {
        Self {
            id: credential.id,
            username: credential.username,
            description: credential.description,
            division_id: credential.division_id,
            created_at: credential.created_at,
            updated_at: credential.updated_at,
        }
    }
}

/// Optional pagination query parameters (`?offset=0&limit=50`).
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub offset: Option<u64>,
    pub limit: Option<u64>,
}

impl From<PageQuery> for Pagination {
    fn from(query: PageQuery) -> Self {
        let defaults = Pagination::default();
        Pagination {
            offset: query.offset.unwrap_or(defaults.offset),
            limit: query.limit.unwrap_or(defaults.limit),
        }
    }
}
