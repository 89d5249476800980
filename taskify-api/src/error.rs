//! Error handling for the API gateway
//!
//! Every handler returns `ApiResult<T>`. Errors render as
//! `{"error": "<message>"}` with the status below.
//!
//! | Source                                  | ApiError          | HTTP |
//! |-----------------------------------------|-------------------|------|
//! | malformed path id or JSON body          | `BadRequest`      | 400  |
//! | `DomainError::Validation`, edge checks  | `ValidationError` | 400  |
//! | `DomainError::NotFound`, `NotFound`     | `NotFound`        | 404  |
//! | `DomainError::AlreadyExists`            | `Conflict`        | 409  |
//! | `InvalidArgument` status                | `BadRequest`      | 400  |
//! | anything else                           | `InternalError`   | 500  |
//!
//! Domain errors arrive here on the local-direct path; `tonic::Status`
//! arrives on the remote-proxy path. Both map in exactly one step.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use taskify_shared::DomainError;
use tonic::Code;
use validator::{Validate, ValidationErrors};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400), e.g. a non-numeric id or malformed JSON
    BadRequest(String),

    /// Not found (404)
    NotFound(String),

    /// Conflict (409), e.g. a duplicate email
    Conflict(String),

    /// Validation failed (400)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Internal server error (500). The detail is logged, never returned.
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => msg,
            ApiError::ValidationError(errors) => errors
                .iter()
                .map(|detail| format!("{}: {}", detail.field, detail.message))
                .collect::<Vec<_>>()
                .join("; "),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "internal error".to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound(entity) => ApiError::NotFound(format!("{entity} not found")),
            DomainError::AlreadyExists(message) => ApiError::Conflict(message),
            DomainError::Validation { field, reason } => {
                ApiError::ValidationError(vec![ValidationErrorDetail {
                    field,
                    message: reason,
                }])
            }
            DomainError::TransientStorage(detail) | DomainError::Internal(detail) => {
                ApiError::InternalError(detail)
            }
        }
    }
}

/// Status returned by a remote service.
impl From<tonic::Status> for ApiError {
    fn from(status: tonic::Status) -> Self {
        match status.code() {
            Code::NotFound => ApiError::NotFound(status.message().to_string()),
            Code::AlreadyExists => ApiError::Conflict(status.message().to_string()),
            Code::InvalidArgument => ApiError::BadRequest(status.message().to_string()),
            code => ApiError::InternalError(format!(
                "rpc failed with {code:?}: {}",
                status.message()
            )),
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "is invalid".to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::ValidationError(details)
    }
}

/// Runs the `validator` rules of a request body.
pub fn validate_request<T: Validate>(req: &T) -> ApiResult<()> {
    req.validate().map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("board not found".to_string());
        assert_eq!(err.to_string(), "Not found: board not found");
    }

    #[test]
    fn test_domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::NotFound("board"), StatusCode::NOT_FOUND),
            (DomainError::AlreadyExists("taken".to_string()), StatusCode::CONFLICT),
            (DomainError::validation("name", "must not be empty"), StatusCode::BAD_REQUEST),
            (DomainError::TransientStorage("retries".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::Internal("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_rpc_statuses_map_to_http() {
        let cases = [
            (tonic::Status::not_found("board not found"), StatusCode::NOT_FOUND),
            (tonic::Status::already_exists("taken"), StatusCode::CONFLICT),
            (tonic::Status::invalid_argument("name: must not be empty"), StatusCode::BAD_REQUEST),
            (tonic::Status::internal("internal error"), StatusCode::INTERNAL_SERVER_ERROR),
            (tonic::Status::unavailable("connection refused"), StatusCode::INTERNAL_SERVER_ERROR),
            (tonic::Status::deadline_exceeded("timeout"), StatusCode::INTERNAL_SERVER_ERROR),
            (tonic::Status::cancelled("cancelled"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (status, expected) in cases {
            assert_eq!(ApiError::from(status).status(), expected);
        }
    }

    #[tokio::test]
    async fn test_internal_error_body_is_opaque() {
        let response = ApiError::InternalError("pool timed out".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "internal error"}));
    }

    #[tokio::test]
    async fn test_validation_body_names_field() {
        let response = ApiError::from(DomainError::validation("name", "must not be empty"))
            .into_response();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "name: must not be empty");
    }
}
