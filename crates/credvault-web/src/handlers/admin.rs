//! Admin routes: user listing, directory provisioning, assignment and
//! role management.
//!
//! The `assign`/`unassign` bodies accept a division id, an OU id, or
//! both, and apply whichever are present, so the administration UI
//! can set both memberships in one call.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use credvault_core::error::VaultError;
use credvault_core::repository::UserRepository;
use serde::Deserialize;
use serde_json::json;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::AdminPrincipal;
use crate::handlers::{PageQuery, UserResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub user_id: Uuid,
    pub division_id: Option<Uuid>,
    pub ou_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ChangeRoleRequest {
    pub user_id: Uuid,
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrgUnitRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateDivisionRequest {
    pub name: String,
    pub ou_id: Uuid,
}

pub async fn list_users<C: Connection>(
    State(state): State<AppState<C>>,
    AdminPrincipal(_principal): AdminPrincipal,
    Query(page): Query<PageQuery>,
) -> ApiResult<impl IntoResponse> {
    let result = state.users.list(page.into()).await?;

    Ok(Json(json!({
        "result": result.items.into_iter().map(UserResponse::from).collect::<Vec<_>>(),
        "total": result.total,
        "offset": result.offset,
        "limit": result.limit,
    })))
}

pub async fn get_user<C: Connection>(
    State(state): State<AppState<C>>,
    AdminPrincipal(_principal): AdminPrincipal,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.get_by_id(id).await?;
    Ok(Json(json!({ "user": UserResponse::from(user) })))
}

pub async fn list_divisions<C: Connection>(
    State(state): State<AppState<C>>,
    AdminPrincipal(_principal): AdminPrincipal,
) -> ApiResult<impl IntoResponse> {
    let divisions = state.directory.list_divisions().await?;
    Ok(Json(json!({ "divisions": divisions })))
}

/// The divisions owned by one organisational unit (the derived
/// back-link view).
pub async fn ou_divisions<C: Connection>(
    State(state): State<AppState<C>>,
    AdminPrincipal(_principal): AdminPrincipal,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let divisions = state.directory.divisions_of_ou(id).await?;
    Ok(Json(json!({ "divisions": divisions })))
}

pub async fn list_ous<C: Connection>(
    State(state): State<AppState<C>>,
    AdminPrincipal(_principal): AdminPrincipal,
) -> ApiResult<impl IntoResponse> {
    // Returned as a plain array (the admin UI consumes it directly).
    let ous = state.directory.list_ous().await?;
    Ok(Json(ous))
}

pub async fn create_ou<C: Connection>(
    State(state): State<AppState<C>>,
    AdminPrincipal(principal): AdminPrincipal,
    Json(request): Json<CreateOrgUnitRequest>,
) -> ApiResult<impl IntoResponse> {
    let ou = state.directory.create_ou(&principal, &request.name).await?;
    Ok((StatusCode::CREATED, Json(json!({ "result": ou }))))
}

pub async fn create_division<C: Connection>(
    State(state): State<AppState<C>>,
    AdminPrincipal(principal): AdminPrincipal,
    Json(request): Json<CreateDivisionRequest>,
) -> ApiResult<impl IntoResponse> {
    let division = state
        .directory
        .create_division(&principal, &request.name, request.ou_id)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "result": division }))))
}

pub async fn delete_division<C: Connection>(
    State(state): State<AppState<C>>,
    AdminPrincipal(principal): AdminPrincipal,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let removed = state.directory.delete_division(&principal, id).await?;
    Ok(Json(json!({
        "message": "Division deleted successfully.",
        "credentials_removed": removed,
    })))
}

pub async fn assign<C: Connection>(
    State(state): State<AppState<C>>,
    AdminPrincipal(principal): AdminPrincipal,
    Json(request): Json<AssignRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.division_id.is_none() && request.ou_id.is_none() {
        return Err(VaultError::validation("division_id or ou_id is required").into());
    }

    if let Some(division_id) = request.division_id {
        state
            .assignments
            .assign_division(&principal, request.user_id, division_id)
            .await?;
    }
    if let Some(ou_id) = request.ou_id {
        state
            .assignments
            .assign_ou(&principal, request.user_id, ou_id)
            .await?;
    }

    let user = state.users.get_by_id(request.user_id).await?;
    Ok(Json(json!({
        "message": "User assigned successfully",
        "result": UserResponse::from(user),
    })))
}

pub async fn unassign<C: Connection>(
    State(state): State<AppState<C>>,
    AdminPrincipal(principal): AdminPrincipal,
    Json(request): Json<AssignRequest>,
) -> ApiResult<impl IntoResponse> {
    if request.division_id.is_none() && request.ou_id.is_none() {
        return Err(VaultError::validation("division_id or ou_id is required").into());
    }

    if let Some(division_id) = request.division_id {
        state
            .assignments
            .unassign_division(&principal, request.user_id, division_id)
            .await?;
    }
    if let Some(ou_id) = request.ou_id {
        state
            .assignments
            .unassign_ou(&principal, request.user_id, ou_id)
            .await?;
    }

    let user = state.users.get_by_id(request.user_id).await?;
    Ok(Json(json!({
        "message": "User unassigned successfully",
        "result": UserResponse::from(user),
    })))
}

pub async fn change_role<C: Connection>(
    State(state): State<AppState<C>>,
    AdminPrincipal(principal): AdminPrincipal,
    Json(request): Json<ChangeRoleRequest>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .assignments
        .change_role(&principal, request.user_id, &request.role)
        .await?;

    Ok(Json(json!({
        "message": "User role updated successfully",
        "result": UserResponse::from(user),
    })))
}
