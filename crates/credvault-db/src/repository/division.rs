//! SurrealDB implementation of [`DivisionRepository`].

use chrono::{DateTime, Utc};
use credvault_core::error::VaultResult;
use credvault_core::models::division::{CreateDivision, Division};
use credvault_core::repository::DivisionRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct DivisionRow {
    name: String,
    ou_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct DivisionRowWithId {
    record_id: String,
    name: String,
    ou_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DivisionRow {
    fn into_division(self, id: Uuid) -> Result<Division, DbError> {
        let ou_id = Uuid::parse_str(&self.ou_id)
            .map_err(|e| DbError::Query(format!("invalid org unit UUID: {e}")))?;
        Ok(Division {
            id,
            name: self.name,
            ou_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl DivisionRowWithId {
    fn try_into_division(self) -> Result<Division, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        let ou_id = Uuid::parse_str(&self.ou_id)
            .map_err(|e| DbError::Query(format!("invalid org unit UUID: {e}")))?;
        Ok(Division {
            id,
            name: self.name,
            ou_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Division repository.
pub struct SurrealDivisionRepository<C: Connection> {
    db: Surreal<C>,
}

// Manual Clone: `Surreal<C>` clones via an internal Arc, so `C` itself
// need not be `Clone`.
impl<C: Connection> Clone for SurrealDivisionRepository<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

impl<C: Connection> SurrealDivisionRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn select_many(
        &self,
        condition: &str,
        bind: Option<(&'static str, Vec<String>)>,
    ) -> VaultResult<Vec<Division>> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM division \
             {condition} ORDER BY created_at ASC"
        );

        let mut builder = self.db.query(query);
        if let Some(bind) = bind {
            builder = builder.bind(bind);
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<DivisionRowWithId> = result.take(0).map_err(DbError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| row.try_into_division())
            .collect::<Result<Vec<_>, DbError>>()?)
    }
}

impl<C: Connection> DivisionRepository for SurrealDivisionRepository<C> {
    async fn create(&self, input: CreateDivision) -> VaultResult<Division> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('division', $id) SET \
                 name = $name, ou_id = $ou_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .bind(("ou_id", input.ou_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<DivisionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "division".into(),
            id: id_str,
        })?;

        Ok(row.into_division(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> VaultResult<Division> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('division', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<DivisionRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "division".into(),
            id: id_str,
        })?;

        Ok(row.into_division(id)?)
    }

    async fn list(&self) -> VaultResult<Vec<Division>> {
        self.select_many("", None).await
    }

    async fn list_by_ids(&self, ids: &[Uuid]) -> VaultResult<Vec<Division>> {
        let id_strs: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        self.select_many("WHERE meta::id(id) IN $ids", Some(("ids", id_strs)))
            .await
    }

    async fn list_by_ou(&self, ou_id: Uuid) -> VaultResult<Vec<Division>> {
        self.select_many(
            "WHERE ou_id IN $ou_ids",
            Some(("ou_ids", vec![ou_id.to_string()])),
        )
        .await
    }

    async fn delete(&self, id: Uuid) -> VaultResult<()> {
        let id_str = id.to_string();

        self.db
            .query("DELETE type::record('division', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }
}
