//! Route definitions for the CredVault web server.

use axum::Router;
use axum::routing::{delete, get, post, put};
use surrealdb::Connection;

use crate::handlers::{admin, auth, credentials, health, user};
use crate::state::AppState;

/// Create API routes.
pub fn api_routes<C: Connection>() -> Router<AppState<C>> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Registration and login
        .route("/auth/register", post(auth::register::<C>))
        .route("/auth/login", post(auth::login::<C>))
        .route("/auth/me", get(auth::me::<C>))
        // Credential repository
        .route("/credentials", get(credentials::list::<C>))
        .route("/credentials", post(credentials::create::<C>))
        .route("/credentials/{id}", get(credentials::get_one::<C>))
        .route("/credentials/{id}", put(credentials::update::<C>))
        .route("/credentials/{id}", delete(credentials::delete::<C>))
        // Self-service views
        .route("/user/divisions", get(user::my_divisions::<C>))
        .route("/user/ous", get(user::my_ous::<C>))
        .route(
            "/user/divisions/{id}/credentials",
            get(user::division_credentials::<C>),
        )
        // Administration
        .route("/admin/users", get(admin::list_users::<C>))
        .route("/admin/users/{id}", get(admin::get_user::<C>))
        .route("/admin/divisions", get(admin::list_divisions::<C>))
        .route("/admin/divisions", post(admin::create_division::<C>))
        .route("/admin/divisions/{id}", delete(admin::delete_division::<C>))
        .route("/admin/ous", get(admin::list_ous::<C>))
        .route("/admin/ous", post(admin::create_ou::<C>))
        .route("/admin/ous/{id}/divisions", get(admin::ou_divisions::<C>))
        .route("/admin/assign", post(admin::assign::<C>))
        .route("/admin/unassign", post(admin::unassign::<C>))
        .route("/admin/change-role", post(admin::change_role::<C>))
}

/// All routes, nested under `/api`.
pub fn all_routes<C: Connection>() -> Router<AppState<C>> {
    Router::new().nest("/api", api_routes())
}
