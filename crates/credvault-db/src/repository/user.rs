//! SurrealDB implementation of [`UserRepository`].
//!
//! Password hashing uses Argon2id with OWASP-recommended parameters
//! (memory: 19 MiB, iterations: 2, parallelism: 1). Salt is randomly
//! generated per hash. An optional pepper (server-side secret) can be
//! provided at construction time.
//!
//! Division/OU assignment mutations run as store-side set operations
//! (`array::union` / `-=`) in a single UPDATE statement, so two
//! concurrent assignments on the same user cannot lose an update.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::{DateTime, Utc};
use credvault_core::error::VaultResult;
use credvault_core::models::user::{CreateUser, Role, User, UserStatus};
use credvault_core::repository::{PaginatedResult, Pagination, UserRepository};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    username: String,
    password_hash: String,
    role: String,
    divisions: Vec<String>,
    ous: Vec<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    username: String,
    password_hash: String,
    role: String,
    divisions: Vec<String>,
    ous: Vec<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_role(s: &str) -> Result<Role, DbError> {
    match s {
        "normal" => Ok(Role::Normal),
        "management" => Ok(Role::Management),
        "admin" => Ok(Role::Admin),
        other => Err(DbError::Query(format!("unknown user role: {other}"))),
    }
}

fn parse_status(s: &str) -> Result<UserStatus, DbError> {
    match s {
        "active" => Ok(UserStatus::Active),
        "inactive" => Ok(UserStatus::Inactive),
        other => Err(DbError::Query(format!("unknown user status: {other}"))),
    }
}

fn status_to_string(s: UserStatus) -> &'static str {
    match s {
        UserStatus::Active => "active",
        UserStatus::Inactive => "inactive",
    }
}

fn parse_uuid_list(raw: Vec<String>, field: &str) -> Result<Vec<Uuid>, DbError> {
    raw.iter()
        .map(|s| {
            Uuid::parse_str(s).map_err(|e| DbError::Query(format!("invalid {field} UUID: {e}")))
        })
        .collect()
}

impl UserRow {
    fn into_user(self, id: Uuid) -> Result<User, DbError> {
        Ok(User {
            id,
            username: self.username,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            divisions: parse_uuid_list(self.divisions, "division")?,
            ous: parse_uuid_list(self.ous, "org unit")?,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self) -> Result<User, DbError> {
        let id = Uuid::parse_str(&self.record_id)
            .map_err(|e| DbError::Query(format!("invalid UUID: {e}")))?;
        Ok(User {
            id,
            username: self.username,
            password_hash: self.password_hash,
            role: parse_role(&self.role)?,
            divisions: parse_uuid_list(self.divisions, "division")?,
            ous: parse_uuid_list(self.ous, "org unit")?,
            status: parse_status(&self.status)?,
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

/// Hash a password with Argon2id using OWASP-recommended parameters.
///
/// If a pepper is provided, it is prepended to the password before
/// hashing. The salt is randomly generated for each call.
pub(crate) fn hash_password(password: &str, pepper: Option<&str>) -> Result<String, DbError> {
    // OWASP ASVS recommended: m=19456 (19 MiB), t=2, p=1
    let params = argon2::Params::new(19456, 2, 1, None)
        .map_err(|e| DbError::Query(format!("argon2 params error: {e}")))?;
    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params);

    let peppered: String;
    let input = match pepper {
        Some(p) => {
            peppered = format!("{p}{password}");
            peppered.as_bytes()
        }
        None => password.as_bytes(),
    };

    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = argon2
        .hash_password(input, &salt)
        .map_err(|e| DbError::Query(format!("password hash error: {e}")))?;

    Ok(hash.to_string())
}

/// SurrealDB implementation of the User repository.
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
    /// Optional server-side pepper for password hashing.
    pepper: Option<String>,
}

// Manual Clone: `Surreal<C>` clones via an internal Arc, so `C` itself
// need not be `Clone`.
impl<C: Connection> Clone for SurrealUserRepository<C> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            pepper: self.pepper.clone(),
        }
    }
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db, pepper: None }
    }

    pub fn with_pepper(db: Surreal<C>, pepper: String) -> Self {
        Self {
            db,
            pepper: Some(pepper),
        }
    }

    /// Run a single-record UPDATE with one extra binding and return
    /// the updated user. All mutations on this repository funnel
    /// through here so the NotFound handling lives in one place.
    async fn update_one(
        &self,
        id: Uuid,
        set_clause: &str,
        bind: (&'static str, String),
    ) -> VaultResult<User> {
        let id_str = id.to_string();

        let query = format!(
            "UPDATE type::record('user', $id) SET {set_clause}, \
             updated_at = time::now()"
        );

        let result = self
            .db
            .query(query)
            .bind(("id", id_str.clone()))
            .bind(bind)
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create(&self, input: CreateUser) -> VaultResult<User> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let password_hash = hash_password(&input.password, self.pepper.as_deref())?;

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 username = $username, \
                 password_hash = $password_hash, \
                 role = 'normal', \
                 divisions = [], \
                 ous = [], \
                 status = 'active'",
            )
            .bind(("id", id_str.clone()))
            .bind(("username", input.username))
            .bind(("password_hash", password_hash))
            .await
            .map_err(DbError::from)?;

        let mut result = result.check().map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> VaultResult<User> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('user', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        Ok(row.into_user(id)?)
    }

    async fn get_by_username(&self, username: &str) -> VaultResult<User> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 WHERE username = $username",
            )
            .bind(("username", username.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: format!("username={username}"),
        })?;

        Ok(row.try_into_user()?)
    }

    async fn list(&self, pagination: Pagination) -> VaultResult<PaginatedResult<User>> {
        let mut count_result = self
            .db
            .query("SELECT count() AS total FROM user GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let count_rows: Vec<CountRow> = count_result.take(0).map_err(DbError::from)?;
        let total = count_rows.first().map(|r| r.total).unwrap_or(0);

        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM user \
                 ORDER BY created_at ASC \
                 LIMIT $limit START $offset",
            )
            .bind(("limit", pagination.limit))
            .bind(("offset", pagination.offset))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        let items = rows
            .into_iter()
            .map(|row| row.try_into_user())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(PaginatedResult {
            items,
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        })
    }

    async fn set_role(&self, id: Uuid, role: Role) -> VaultResult<User> {
        self.update_one(id, "role = $role", ("role", role.as_str().to_string()))
            .await
    }

    async fn set_status(&self, id: Uuid, status: UserStatus) -> VaultResult<User> {
        self.update_one(
            id,
            "status = $status",
            ("status", status_to_string(status).to_string()),
        )
        .await
    }

    async fn add_division(&self, user_id: Uuid, division_id: Uuid) -> VaultResult<User> {
        // array::union keeps set semantics even under concurrent adds.
        self.update_one(
            user_id,
            "divisions = array::union(divisions, [$division_id])",
            ("division_id", division_id.to_string()),
        )
        .await
    }

    async fn remove_division(&self, user_id: Uuid, division_id: Uuid) -> VaultResult<User> {
        self.update_one(
            user_id,
            "divisions -= $division_id",
            ("division_id", division_id.to_string()),
        )
        .await
    }

    async fn add_ou(&self, user_id: Uuid, ou_id: Uuid) -> VaultResult<User> {
        self.update_one(
            user_id,
            "ous = array::union(ous, [$ou_id])",
            ("ou_id", ou_id.to_string()),
        )
        .await
    }

    async fn remove_ou(&self, user_id: Uuid, ou_id: Uuid) -> VaultResult<User> {
        self.update_one(user_id, "ous -= $ou_id", ("ou_id", ou_id.to_string()))
            .await
    }
}
