//! Request extractors for authenticated and admin principals.
//!
//! Every protected route takes one of these as an argument; the
//! bearer token is resolved to a fresh principal snapshot per request
//! and there is no ambient session state anywhere in the process.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use credvault_core::authz::Principal;
use credvault_core::error::VaultError;
use surrealdb::Connection;

use crate::error::ApiError;
use crate::state::AppState;

/// Extract and validate the bearer token from the Authorization
/// header.
fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| {
            ApiError(VaultError::Unauthenticated {
                reason: "no token provided".into(),
            })
        })?
        .to_str()
        .map_err(|_| {
            ApiError(VaultError::Unauthenticated {
                reason: "malformed authorization header".into(),
            })
        })?;

    header.strip_prefix("Bearer ").ok_or_else(|| {
        ApiError(VaultError::Unauthenticated {
            reason: "expected a bearer token".into(),
        })
    })
}

/// An authenticated caller: token verified and resolved to a fresh
/// principal snapshot.
pub struct AuthPrincipal(pub Principal);

impl<C: Connection> FromRequestParts<AppState<C>> for AuthPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<C>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let principal = state.auth.resolve_principal(token).await?;
        Ok(AuthPrincipal(principal))
    }
}

/// An authenticated caller that must be an admin.
///
/// The single admin gate for the `/admin` routes — the per-operation
/// decisions still run through the authorization engine in the
/// service layer.
pub struct AdminPrincipal(pub Principal);

impl<C: Connection> FromRequestParts<AppState<C>> for AdminPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<C>,
    ) -> Result<Self, Self::Rejection> {
        let AuthPrincipal(principal) = AuthPrincipal::from_request_parts(parts, state).await?;
        if !principal.is_admin() {
            return Err(ApiError(VaultError::forbidden(
                "Access denied. Admins only.",
            )));
        }
        Ok(AdminPrincipal(principal))
    }
}
