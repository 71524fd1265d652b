//! Registration, login, and current-user handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use credvault_core::repository::UserRepository;
use serde::Deserialize;
use serde_json::json;
use surrealdb::Connection;

use crate::error::ApiResult;
use crate::extract::AuthPrincipal;
use crate::handlers::UserResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn register<C: Connection>(
    State(state): State<AppState<C>>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let output = state
        .auth
        .register(&request.username, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "result": UserResponse::from(output.user),
            "token": output.access_token,
            "expires_in": output.expires_in,
        })),
    ))
}

pub async fn login<C: Connection>(
    State(state): State<AppState<C>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let output = state
        .auth
        .login(&request.username, &request.password)
        .await?;

    Ok(Json(json!({
        "result": UserResponse::from(output.user),
        "token": output.access_token,
        "expires_in": output.expires_in,
    })))
}

pub async fn me<C: Connection>(
    State(state): State<AppState<C>>,
    AuthPrincipal(principal): AuthPrincipal,
) -> ApiResult<impl IntoResponse> {
    let user = state.users.get_by_id(principal.user_id).await?;
    Ok(Json(json!({ "user": UserResponse::from(user) })))
}
