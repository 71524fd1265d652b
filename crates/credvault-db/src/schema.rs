//! Schema definitions and migration runner for SurrealDB.
//!
//! All table definitions use SCHEMAFULL mode for data integrity.
//! UUIDs are stored as strings. Enums are stored as strings with
//! ASSERT constraints for validation. Division and credential lists
//! are not duplicated as arrays on their parent records; both are
//! derived on read from the owning foreign key.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1 — initial table definitions
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organisational units
-- =======================================================================
DEFINE TABLE org_unit SCHEMAFULL;
DEFINE FIELD name ON TABLE org_unit TYPE string;
DEFINE FIELD created_at ON TABLE org_unit TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE org_unit TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_org_unit_name ON TABLE org_unit COLUMNS name UNIQUE;

-- =======================================================================
-- Divisions (owned by exactly one organisational unit)
-- =======================================================================
DEFINE TABLE division SCHEMAFULL;
DEFINE FIELD name ON TABLE division TYPE string;
DEFINE FIELD ou_id ON TABLE division TYPE string;
DEFINE FIELD created_at ON TABLE division TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE division TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_division_ou ON TABLE division COLUMNS ou_id;

-- =======================================================================
-- Users
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD username ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD role ON TABLE user TYPE string \
    ASSERT $value IN ['normal', 'management', 'admin'];
DEFINE FIELD divisions ON TABLE user TYPE array<string> DEFAULT [];
DEFINE FIELD ous ON TABLE user TYPE array<string> DEFAULT [];
DEFINE FIELD status ON TABLE user TYPE string \
    ASSERT $value IN ['active', 'inactive'];
DEFINE FIELD created_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_user_username ON TABLE user COLUMNS username UNIQUE;

-- =======================================================================
-- Credentials (owned by exactly one division)
-- =======================================================================
DEFINE TABLE credential SCHEMAFULL;
DEFINE FIELD username ON TABLE credential TYPE string;
DEFINE FIELD password_hash ON TABLE credential TYPE string;
DEFINE FIELD description ON TABLE credential TYPE option<string>;
DEFINE FIELD division_id ON TABLE credential TYPE string;
DEFINE FIELD created_at ON TABLE credential TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE credential TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_credential_division ON TABLE credential \
    COLUMNS division_id;
DEFINE INDEX idx_credential_division_username ON TABLE credential \
    COLUMNS division_id, username UNIQUE;
";

// -----------------------------------------------------------------------
// Migration runner
// -----------------------------------------------------------------------

/// Apply any pending schema migrations.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
/// All DEFINE statements are idempotent so re-running is safe.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    // Ensure migration tracking table exists (idempotent).
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    // Determine current schema version.
    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                name = migration.name,
                "Applying migration"
            );
            db.query(migration.sql).await?.check().map_err(|e| {
                DbError::Migration(format!(
                    "Migration v{} '{}' failed: {}",
                    migration.version, migration.name, e,
                ))
            })?;

            // Record the applied migration.
            db.query(
                "CREATE _migration SET version = $version, \
                 name = $name",
            )
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

            info!(
                version = migration.version,
                "Migration applied successfully"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_is_nonempty() {
        assert!(!SCHEMA_V1.is_empty());
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
