//! CredVault Web — the REST API layer.
//!
//! Routes, handlers, bearer-token extraction, and the mapping from
//! domain errors to HTTP responses. The server binary lives in
//! `main.rs`; everything here is also usable against an in-memory
//! database for tests.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use config::WebConfig;
pub use error::ApiError;
pub use routes::api_routes;
pub use state::AppState;
