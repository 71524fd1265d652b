//! Credential CRUD handlers. All authorization decisions happen in
//! the service layer; these are transport shims.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use credvault_core::models::credential::{CreateCredential, UpdateCredential};
use serde::Deserialize;
use serde_json::json;
use surrealdb::Connection;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::extract::AuthPrincipal;
use crate::handlers::{CredentialResponse, PageQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCredentialRequest {
    pub username: String,
    pub password: String,
    pub description: Option<String>,
    pub division_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCredentialRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub description: Option<String>,
    pub division_id: Option<Uuid>,
}

pub async fn list<C: Connection>(
    State(state): State<AppState<C>>,
    AuthPrincipal(principal): AuthPrincipal,
    Query(page): Query<PageQuery>,
) -> ApiResult<impl IntoResponse> {
    let result = state.credentials.list(&principal, page.into()).await?;

    Ok(Json(json!({
        "result": result.items.into_iter().map(CredentialResponse::from).collect::<Vec<_>>(),
        "total": result.total,
        "offset": result.offset,
        "limit": result.limit,
    })))
}

pub async fn get_one<C: Connection>(
    State(state): State<AppState<C>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let credential = state.credentials.get(&principal, id).await?;
    Ok(Json(
        json!({ "result": CredentialResponse::from(credential) }),
    ))
}

pub async fn create<C: Connection>(
    State(state): State<AppState<C>>,
    AuthPrincipal(principal): AuthPrincipal,
    Json(request): Json<CreateCredentialRequest>,
) -> ApiResult<impl IntoResponse> {
    let credential = state
        .credentials
        .create(
            &principal,
            CreateCredential {
                username: request.username,
                password: request.password,
                description: request.description,
                division_id: request.division_id,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "result": CredentialResponse::from(credential) })),
    ))
}

pub async fn update<C: Connection>(
    State(state): State<AppState<C>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCredentialRequest>,
) -> ApiResult<impl IntoResponse> {
    let credential = state
        .credentials
        .update(
            &principal,
            id,
            UpdateCredential {
                username: request.username,
                password: request.password,
                description: request.description,
                division_id: request.division_id,
            },
        )
        .await?;

    Ok(Json(
        json!({ "result": CredentialResponse::from(credential) }),
    ))
}

pub async fn delete<C: Connection>(
    State(state): State<AppState<C>>,
    AuthPrincipal(principal): AuthPrincipal,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.credentials.delete(&principal, id).await?;
    Ok(Json(json!({ "message": "Credential deleted successfully." })))
}
