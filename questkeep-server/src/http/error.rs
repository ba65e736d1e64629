//! API error types with IntoResponse
//!
//! Every failure leaves the server as `{"error": <code>, "message": ...}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::repos::DbError;
use crate::models::{Entity, ValidationError};
use crate::services::ServiceError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Resource not found (404)
    NotFound { label: &'static str, id: String },

    /// Key or unique column already taken (400)
    AlreadyExists { message: String },

    /// Foreign key not satisfied (409)
    Conflict { message: String },

    /// Database error (500, logged)
    Database(DbError),
}

impl ApiError {
    pub fn not_found<E: Entity>(key: &E::Key) -> Self {
        Self::NotFound {
            label: E::LABEL,
            id: key.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "validation_error",
                    "message": e.to_string()
                }),
            ),
            Self::NotFound { label, id } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "not_found",
                    "message": format!("{} '{}' not found", label, id)
                }),
            ),
            Self::AlreadyExists { message } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "already_exists",
                    "message": message
                }),
            ),
            Self::Conflict { message } => (
                StatusCode::CONFLICT,
                json!({
                    "error": "conflict",
                    "message": message
                }),
            ),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "internal_error",
                        "message": "an internal error occurred"
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(ValidationError::Body {
            reason: rejection.body_text(),
        })
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::AlreadyExists { .. } | ServiceError::Duplicate { .. } => {
                Self::AlreadyExists {
                    message: e.to_string(),
                }
            }
            ServiceError::Reference { .. } => Self::Conflict {
                message: e.to_string(),
            },
            ServiceError::Store(DbError::NotFound { resource, id }) => Self::NotFound {
                label: resource,
                id,
            },
            ServiceError::Store(e) => Self::Database(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400() {
        let err = ApiError::Validation(ValidationError::Empty {
            field: "wallet address",
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn not_found_is_404() {
        let err = ApiError::NotFound {
            label: "User",
            id: "0xabc".into(),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "User '0xabc' not found");
    }

    #[tokio::test]
    async fn duplicate_key_is_400() {
        let err: ApiError = ServiceError::AlreadyExists {
            resource: "item",
            key: "sword_of_truth".into(),
        }
        .into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "already_exists");
    }

    #[tokio::test]
    async fn reference_is_409() {
        let err: ApiError = ServiceError::Reference {
            resource: "user",
            constraint: "items_owner_wallet_fkey".into(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn database_error_hides_detail() {
        let err: ApiError = ServiceError::Store(DbError::Sqlx(sqlx::Error::PoolTimedOut)).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await["message"],
            "an internal error occurred"
        );
    }
}
