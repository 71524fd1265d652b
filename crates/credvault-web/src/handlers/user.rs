//! Self-service routes: the caller's own divisions, visible OUs, and
//! per-division credential listings.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use credvault_core::repository::UserRepository;
use serde_json::json;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::AuthPrincipal;
use crate::handlers::{CredentialResponse, PageQuery};
use crate::state::AppState;

/// The divisions the caller is assigned to, resolved to full records.
pub async fn my_divisions<C: Connection>(
    State(state): State<AppState<C>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> ApiResult<impl IntoResponse> {
    let ids: Vec<Uuid> = principal.divisions.iter().copied().collect();
    let divisions = state.directory.divisions_by_ids(&ids).await?;
    Ok(Json(divisions))
}

/// The organisational units visible to the caller — the union of
/// direct assignments and the OUs of the caller's divisions.
pub async fn my_ous<C: Connection>(
    State(state): State<AppState<C>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.get_by_id(principal.user_id).await?;
    let ous = state.assignments.visible_ous(&user).await?;
    Ok(Json(ous))
}

/// The credential repository of one division, access-checked.
pub async fn division_credentials<C: Connection>(
    State(state): State<AppState<C>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(division_id): Path<Uuid>,
    Query(page): Query<PageQuery>,
) -> ApiResult<impl IntoResponse> {
    let result = state
        .credentials
        .list_for_division(&principal, division_id, page.into())
        .await?;

    Ok(Json(json!({
        "result": result.items.into_iter().map(CredentialResponse::from).collect::<Vec<_>>(),
        "total": result.total,
        "offset": result.offset,
        "limit": result.limit,
    })))
}
