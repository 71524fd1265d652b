//! SurrealDB implementation of [`OrgUnitRepository`].

use chrono::{DateTime, Utc};
use credvault_core::error::VaultResult;
use credvault_core::models::org_unit::{CreateOrgUnit, OrgUnit};
use credvault_core::repository::OrgUnitRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct OrgUnitRow {
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OrgUnitRowWithId {
    record_id: String,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrgUnitRow {
    fn into_org_unit(self, id: Uuid) -> OrgUnit {
        OrgUnit {
            id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl OrgUnitRowWithId {
    fn try_into_org_unit(self) -> Result<OrgUnit, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        Ok(OrgUnit {
            id,
            name: self.name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the OrgUnit repository.
pub struct SurrealOrgUnitRepository<C: Connection> {
    db: Surreal<C>,
}

// Manual Clone: `Surreal<C>` clones via an internal Arc, so `C` itself
// need not be `Clone`.
impl<C: Connection> Clone for SurrealOrgUnitRepository<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> SurrealOrgUnitRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OrgUnitRepository for SurrealOrgUnitRepository<C> {
    async fn create(&self, input: CreateOrgUnit) -> VaultResult<OrgUnit> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query("CREATE type::record('org_unit', $id) SET name = $name")
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<OrgUnitRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "org_unit".into(),
            id: id_str,
        })?;

        Ok(row.into_org_unit(id))
    }

    async fn get_by_id(&self, id: Uuid) -> VaultResult<OrgUnit> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('org_unit', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrgUnitRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "org_unit".into(),
            id: id_str,
        })?;

        Ok(row.into_org_unit(id))
    }

    async fn get_by_name(&self, name: &str) -> VaultResult<Option<OrgUnit>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM org_unit \
                 WHERE name = $name",
            )
            .bind(("name", name.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrgUnitRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_org_unit()?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> VaultResult<Vec<OrgUnit>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM org_unit \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrgUnitRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_org_unit())
            .collect::<Result<Vec<_>, DbError>>()?)
    }

    async fn list_by_ids(&self, ids: &[Uuid]) -> VaultResult<Vec<OrgUnit>> {
        let id_strs: Vec<String> = ids.iter().map(|id| id.to_string()).collect();

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM org_unit \
                 WHERE meta::id(id) IN $ids \
                 ORDER BY created_at ASC",
            )
            .bind(("ids", id_strs))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrgUnitRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_org_unit())
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}
