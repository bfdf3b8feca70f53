//! HTTP error mapping.
//!
//! Every handler returns `Result<_, ApiError>`. The error code decides the
//! status in one place; server-side failures are logged with their message
//! and answered with a generic one.

use std::collections::HashMap;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::foundation::{AuthError, DomainError, ErrorCode, ValidationError};

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Human-readable error message.
    pub error: String,
    /// Error code for programmatic handling.
    pub code: String,
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub details: HashMap<String, String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
            details: HashMap::new(),
        }
    }
}

/// HTTP status for an error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationFailed | ErrorCode::InvalidWebhook => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden | ErrorCode::PlanLimitReached | ErrorCode::FeatureNotInPlan => {
            StatusCode::FORBIDDEN
        }
        ErrorCode::CardNotFound | ErrorCode::SubscriptionNotFound | ErrorCode::CustomerNotFound => {
            StatusCode::NOT_FOUND
        }
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::PaymentProviderError => StatusCode::BAD_GATEWAY,
        ErrorCode::DatabaseError | ErrorCode::ConfigurationError | ErrorCode::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Error returned by HTTP handlers.
#[derive(Debug, Clone)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self(DomainError::validation(field, message))
    }

    pub fn status(&self) -> StatusCode {
        status_for(self.0.code)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let code = match err {
            AuthError::InvalidToken | AuthError::TokenExpired => ErrorCode::Unauthorized,
            AuthError::ServiceUnavailable(_) => ErrorCode::ConfigurationError,
        };
        Self(DomainError::new(code, err.to_string()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let err = self.0;

        let body = if status.is_server_error() {
            tracing::error!(code = %err.code, status = status.as_u16(), error = %err.message, "request failed");
            let message = match err.code {
                ErrorCode::PaymentProviderError => "Payment provider request failed",
                _ => "Internal server error",
            };
            ErrorResponse::new(err.code.to_string(), message)
        } else {
            tracing::warn!(code = %err.code, status = status.as_u16(), error = %err.message, "request rejected");
            ErrorResponse {
                details: err.details,
                ..ErrorResponse::new(err.code.to_string(), err.message)
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn status_table() {
        assert_eq!(status_for(ErrorCode::ValidationFailed), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorCode::InvalidWebhook), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorCode::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(ErrorCode::PlanLimitReached), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorCode::FeatureNotInPlan), StatusCode::FORBIDDEN);
        assert_eq!(status_for(ErrorCode::CustomerNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorCode::Conflict), StatusCode::CONFLICT);
        assert_eq!(status_for(ErrorCode::PaymentProviderError), StatusCode::BAD_GATEWAY);
        assert_eq!(status_for(ErrorCode::ConfigurationError), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn client_errors_keep_message_and_details() {
        let response = ApiError::validation("name", "Name is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_FAILED");
        assert_eq!(body["error"], "Name is required");
        assert_eq!(body["details"]["field"], "name");
    }

    #[tokio::test]
    async fn server_errors_hide_message() {
        let response = ApiError::from(DomainError::database("connection refused to 10.0.0.5")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert_eq!(body["error"], "Internal server error");
        assert!(body.get("details").is_none());
    }

    #[test]
    fn auth_errors_map_to_codes() {
        assert_eq!(ApiError::from(AuthError::TokenExpired).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::from(AuthError::service_unavailable("no secret")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
