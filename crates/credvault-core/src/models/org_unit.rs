//! Organisational unit domain model.
//!
//! Organisational units are the top-level grouping in the hierarchy.
//! Each contains one or more divisions; the division list is derived
//! from `Division.ou_id` rather than stored on the unit itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrgUnit {
    pub id: Uuid,
    /// Human-readable name, unique across all units.
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrgUnit {
    pub name: String,
}
