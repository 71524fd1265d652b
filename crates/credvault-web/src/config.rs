//! Server configuration, loaded from environment variables.

use credvault_auth::AuthConfig;
use credvault_db::DbConfig;

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Address to bind the HTTP listener to (e.g. `0.0.0.0:5000`).
    pub bind_addr: String,
    pub db: DbConfig,
    pub auth: AuthConfig,
}

impl WebConfig {
    /// Load configuration from the environment.
    ///
    /// The two JWT key variables are required; everything else falls
    /// back to development defaults. Returns an error message naming
    /// the missing variable so startup can fail fast.
    pub fn from_env() -> Result<Self, String> {
        let jwt_private_key_pem = std::env::var("CREDVAULT_JWT_PRIVATE_KEY")
            .map_err(|_| "CREDVAULT_JWT_PRIVATE_KEY is not set".to_string())?;
        let jwt_public_key_pem = std::env::var("CREDVAULT_JWT_PUBLIC_KEY")
            .map_err(|_| "CREDVAULT_JWT_PUBLIC_KEY is not set".to_string())?;

        let db_defaults = DbConfig::default();
        let db = DbConfig {
            url: env_or("CREDVAULT_DB_URL", &db_defaults.url),
            namespace: env_or("CREDVAULT_DB_NAMESPACE", &db_defaults.namespace),
            database: env_or("CREDVAULT_DB_NAME", &db_defaults.database),
            username: env_or("CREDVAULT_DB_USER", &db_defaults.username),
            password: env_or("CREDVAULT_DB_PASSWORD", &db_defaults.password),
        };

        let auth_defaults = AuthConfig::default();
        let auth = AuthConfig {
            jwt_private_key_pem,
            jwt_public_key_pem,
            jwt_issuer: env_or("CREDVAULT_JWT_ISSUER", &auth_defaults.jwt_issuer),
            pepper: std::env::var("CREDVAULT_PEPPER").ok(),
            ..auth_defaults
        };

        Ok(Self {
            bind_addr: env_or("CREDVAULT_BIND", "0.0.0.0:5000"),
            db,
            auth,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
