//! Credential domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored username/password pair (e.g. a shared service account)
/// scoped to exactly one division.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credential {
    pub id: Uuid,
    pub username: String,
    /// Argon2id PHC-format hash. Never serialized to API clients.
    pub password_hash: String,
    pub description: Option<String>,
    /// The owning division.
    pub division_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCredential {
    pub username: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
    pub description: Option<String>,
    pub division_id: Uuid,
}

/// Partial update. Omitted fields retain their prior values.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateCredential {
    pub username: Option<String>,
    /// Raw password; re-hashed before storage when present.
    pub password: Option<String>,
    pub description: Option<String>,
    pub division_id: Option<Uuid>,
}
