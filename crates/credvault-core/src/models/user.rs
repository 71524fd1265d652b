//! User domain model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::VaultError;

/// Coarse-grained permission tier.
///
/// `Normal` users can read and create credentials in their own
/// divisions, `Management` users can additionally update and delete
/// them, and `Admin` users bypass every division check and manage
/// assignments and roles.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Normal,
    Management,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Normal => "normal",
            Role::Management => "management",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Role::Normal),
            "management" => Ok(Role::Management),
            "admin" => Ok(Role::Admin),
            other => Err(VaultError::Validation {
                message: format!("invalid role: {other}"),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    /// Divisions the user is assigned to.
    pub divisions: Vec<Uuid>,
    /// Organisational units assigned directly, independent of the OUs
    /// reachable through `divisions`.
    pub ous: Vec<Uuid>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    /// Raw password (hashed with Argon2id before storage).
    pub password: String,
}
