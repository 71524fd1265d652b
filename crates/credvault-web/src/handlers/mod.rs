//! Request handlers, grouped by route prefix.

pub mod admin;
pub mod auth;
pub mod credentials;
pub mod health;
pub mod user;

mod types;

pub use types::{CredentialResponse, PageQuery, UserResponse};
