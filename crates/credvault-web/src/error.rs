//! Mapping from domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use credvault_core::error::VaultError;
use serde_json::json;
use tracing::{debug, error};

/// Wrapper turning a [`VaultError`] into an HTTP response.
///
/// Domain errors are expected outcomes, not faults: only store and
/// internal failures are logged at error level.
#[derive(Debug)]
pub struct ApiError(pub VaultError);

impl From<VaultError> for ApiError {
    fn from(err: VaultError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            VaultError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            VaultError::Forbidden { .. } => StatusCode::FORBIDDEN,
            VaultError::NotFound { .. } => StatusCode::NOT_FOUND,
            VaultError::Validation { .. } => StatusCode::BAD_REQUEST,
            VaultError::AlreadyAssigned { .. }
            | VaultError::NotAssigned { .. }
            | VaultError::AlreadyExists { .. }
            | VaultError::DuplicateCredential => StatusCode::CONFLICT,
            VaultError::Database(_) | VaultError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed");
        } else {
            debug!(error = %self.0, status = %status, "request rejected");
        }

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Store details stay in the logs, not in the response body.
            "Internal server error".to_string()
        } else {
            self.0.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_covers_the_taxonomy() {
        let cases = [
            (
                VaultError::Unauthenticated {
                    reason: "x".into(),
                },
                StatusCode::UNAUTHORIZED,
            ),
            (
                VaultError::Forbidden { reason: "x".into() },
                StatusCode::FORBIDDEN,
            ),
            (
                VaultError::NotFound {
                    entity: "user".into(),
                    id: "1".into(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                VaultError::Validation {
                    message: "x".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                VaultError::AlreadyAssigned {
                    target: "division".into(),
                },
                StatusCode::CONFLICT,
            ),
            (VaultError::DuplicateCredential, StatusCode::CONFLICT),
            (
                VaultError::Database("boom".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let response = ApiError(err).into_response();
            assert_eq!(response.status(), expected);
        }
    }

    #[test]
    fn internal_errors_do_not_leak_details() {
        let response = ApiError(VaultError::Database("connection string".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
