//! SurrealDB implementation of [`CredentialRepository`].
//!
//! Credential passwords are hashed with the same Argon2id parameters
//! as user passwords; the plaintext never reaches the store.

use chrono::{DateTime, Utc};
use credvault_core::error::VaultResult;
use credvault_core::models::credential::{CreateCredential, Credential, UpdateCredential};
use credvault_core::repository::{CredentialRepository, PaginatedResult, Pagination};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;
use crate::repository::user::hash_password;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct CredentialRow {
    username: String,
    password_hash: String,
    description: Option<String>,
    division_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct CredentialRowWithId {
    record_id: String,
    username: String,
    password_hash: String,
    description: Option<String>,
    division_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CredentialRow {
    fn into_credential(self, id: Uuid) -> Result<Credential, DbError> {
        let division_id = Uuid::parse_str(&self.division_id)
            .map_err(|e| DbError::Query(format!("invalid division UUID: {e}")))?;
        Ok(Credential {
            id,
            username: self.username,
            password_hash: self.password_hash,
            description: self.description,
            division_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl CredentialRowWithId {
    fn try_into_credential(self) -> Result<Credential, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        let division_id = Uuid::parse_str(&self.division_id)
            .map_err(|e| DbError::Query(format!("invalid division UUID: {e}")))?;
        Ok(Credential {
            id,
            username: self.username,
            password_hash: self.password_hash,
            description: self.description,
            division_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

/// SurrealDB implementation of the Credential repository.
pub struct SurrealCredentialRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

// Manual Clone: `Surreal<C>` clones via an internal Arc, so `C` itself
// need not be `Clone`.
impl<C: Connection> Clone for SurrealCredentialRepository<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            pepper: self.pepper.clone(),
        }
    }
}

impl<C: Connection> SurrealCredentialRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }

    async fn paginated(
        &self,
        condition: &str,
        bind: Option<(&'static str, Vec<String>)>,
        pagination: Pagination,
    ) -> VaultResult<PaginatedResult<Credential>> {
        let count_query = format!("SELECT count() AS total FROM credential {condition} GROUP ALL");
        let mut count_builder = self.db.query(count_query);
        if let Some(ref bind) = bind {
            count_builder = count_builder.bind(bind.clone());
        }
        let mut count_result = count_builder.await.map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let query = format!(
            "SELECT meta::id(id) AS record_id, * FROM credential \
             {condition} ORDER BY created_at ASC \
             LIMIT $limit START $offset"
        );
        let mut builder = self
            .db
            .query(query)
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset));
        if let Some(bind) = bind {
            builder = builder.bind(bind);
        }

        let mut result = builder.await.map_err(DbError::from)?;
        let rows: Vec<CredentialRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_credential())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }
}

impl<C: Connection> CredentialRepository for SurrealCredentialRepository<C> {
    async fn create(&self, input: CreateCredential) -> VaultResult<Credential> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let result = self
            .db
            .query(
                "CREATE type::record('credential', $id) SET \
                 username = $username, \
                 password_hash = $password_hash, \
                 description = $description, \
                 division_id = $division_id",
            )
            .bind(("id", id_str.clone()))
            .bind(("username", input.username))
            .bind(("password_hash", password_hash))
            .bind(("description", input.description))
            .bind(("division_id", input.division_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<CredentialRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "credential".into(),
            id: id_str,
        })?;

        Ok(row.into_credential(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> VaultResult<Credential> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('credential', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CredentialRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "credential".into(),
            id: id_str,
        })?;

        Ok(row.into_credential(id)?)
    }

    async fn list_all(&self, pagination: Pagination) -> VaultResult<PaginatedResult<Credential>> {
        self.paginated("", None, pagination).await
    }

    async fn list_by_divisions(
        &self,
        division_ids: &[Uuid],
        pagination: Pagination,
    ) -> VaultResult<PaginatedResult<Credential>> {
        let id_strs: Vec<String> = division_ids.iter().map(|id| id.to_string()).collect();
        self.paginated(
            "WHERE division_id IN $division_ids",
            Some(("division_ids", id_strs)),
            pagination,
        )
        .await
    }

    async fn find_in_division(
        &self,
        division_id: Uuid,
        username: &str,
    ) -> VaultResult<Option<Credential>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM credential \
                 WHERE division_id = $division_id AND username = $username",
            )
            .bind(("division_id", division_id.to_string()))
            .bind(("username", username.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<CredentialRowWithId> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(Some(row.try_into_credential()?)),
            None => Ok(None),
        }
    }

    async fn update(&self, id: Uuid, input: UpdateCredential) -> VaultResult<Credential> {
        let id_str = id.to_string();

        let mut sets = Vec::new();
        if input.username.is_some() {
            sets.push("username = $username");
        }
        if input.password.is_some() {
            sets.push("password_hash = $password_hash");
        }
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.division_id.is_some() {
            sets.push("division_id = $division_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('credential', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id_str.clone()));

        if let Some(username) = input.username {
            builder = builder.bind(("username", username));
        }
        if let Some(password) = input.password {
            let password_hash = hash_password(&password, self.pepper.as_deref())?;
            builder = builder.bind(("password_hash", password_hash));
        }
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(division_id) = input.division_id {
            builder = builder.bind(("division_id", division_id.to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<CredentialRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "credential".into(),
            id: id_str,
        })?;

        Ok(row.into_credential(id)?)
    }

    async fn delete(&self, id: Uuid) -> VaultResult<()> {
        let id_str = id.to_string();

        self.db
            .query("DELETE type::record('credential', $id)")
            .bind(("id", id_str))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn delete_by_division(&self, division_id: Uuid) -> VaultResult<u64> {
        let division_id_str = division_id.to_string();

        let mut count_result = self
            .db
            .query(
                "SELECT count() AS total FROM credential \
                 WHERE division_id = $division_id GROUP ALL",
            )
            .bind(("division_id", division_id_str.clone()))
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        self.db
            .query("DELETE credential WHERE division_id = $division_id")
            .bind(("division_id", division_id_str))
            .await
            .map_err(DbError::from)?;

        Ok(total)
    }
}
