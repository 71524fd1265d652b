//! Division domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sub-unit of an organisational unit. Divisions own credentials and
/// are the unit of access control: a user can see a credential iff the
/// credential's division is in the user's division set (or the user is
/// an admin).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Division {
    pub id: Uuid,
    pub name: String,
    /// The owning organisational unit.
    pub ou_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDivision {
    pub name: String,
    pub ou_id: Uuid,
}
