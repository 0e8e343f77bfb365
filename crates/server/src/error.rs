//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers return `Result<T, AppError>`.
//!
//! Every error renders as a JSON envelope: `{"errors": {"message": "..."}}`
//! for single messages, `{"errors": {"field": ["...", ...]}}` for validation.

use axum::{
    Json,
    extract::multipart::MultipartError,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use storekeep_core::FieldErrors;

use crate::db::RepositoryError;
use crate::services::ServiceError;
use crate::services::auth::AuthError;
use crate::services::media::{ALLOWED_EXTENSIONS, MediaError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Input failed field validation.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Resource not found (or outside the caller's scope).
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Uniqueness rule violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Request body exceeded the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<FieldErrors> for AppError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => Self::Validation(errors),
            ServiceError::NotFound(what) => Self::NotFound(format!("{what} not found.")),
            ServiceError::Unresolved(_) => {
                Self::NotFound("Some products were not found for this store.".to_string())
            }
            ServiceError::Conflict(msg) => Self::Conflict(msg),
            ServiceError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::MissingFile => {
                Self::Validation(FieldErrors::single("image", "This field is required."))
            }
            MediaError::UnsupportedType => Self::Validation(FieldErrors::single(
                "image",
                format!("File type not allowed. Allowed: {}.", ALLOWED_EXTENSIONS.join(", ")),
            )),
            MediaError::Empty => Self::BadRequest("Uploaded file is empty.".to_string()),
            MediaError::Io(e) => Self::Internal(format!("upload write failed: {e}")),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(RepositoryError::Database(err))
    }
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(err: tower_sessions::session::Error) -> Self {
        Self::Internal(format!("session error: {err}"))
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::PayloadTooLarge("Uploaded file is too large.".to_string())
        } else {
            Self::BadRequest(err.body_text())
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_)
                | AuthError::InvalidEmail(_)
                | AuthError::InvalidUsername(_) => StatusCode::BAD_REQUEST,
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }

    /// The `errors` object of the response body.
    fn body(&self) -> serde_json::Value {
        // Don't expose internal error details to clients
        let message = match self {
            Self::Validation(errors) => return json!(errors),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials | AuthError::UserNotFound => {
                    "Invalid credentials.".to_string()
                }
                AuthError::UserAlreadyExists => {
                    "An account with this email or username already exists.".to_string()
                }
                AuthError::WeakPassword(_) => return json!({ "password": [capitalize(err)] }),
                AuthError::InvalidEmail(_) => {
                    return json!({ "email": ["Invalid email address."] });
                }
                AuthError::InvalidUsername(msg) => {
                    return json!({ "username": [capitalize(msg)] });
                }
                AuthError::Repository(_) | AuthError::PasswordHash => {
                    "Internal server error".to_string()
                }
            },
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::BadRequest(msg)
            | Self::Conflict(msg)
            | Self::PayloadTooLarge(msg) => msg.clone(),
        };
        json!({ "message": message })
    }

    fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        (self.status(), Json(json!({ "errors": self.body() }))).into_response()
    }
}

/// Uppercase the first letter and end with a period.
fn capitalize(msg: &impl ToString) -> String {
    let msg = msg.to_string();
    let msg = match msg.split_once(": ") {
        Some((_, detail)) if msg.starts_with("password validation failed") => detail.to_string(),
        _ => msg,
    };
    let mut chars = msg.chars();
    chars.next().map_or_else(String::new, |first| {
        let mut out: String = first.to_uppercase().chain(chars).collect();
        if !out.ends_with('.') {
            out.push('.');
        }
        out
    })
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Order not found.".to_string());
        assert_eq!(err.to_string(), "Not found: Order not found.");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(AppError::NotFound(String::new()).status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::Unauthorized(String::new()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Conflict(String::new()).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::Internal(String::new()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Validation(FieldErrors::single("price", "x")).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_message_envelope() {
        let (status, body) = body_json(AppError::NotFound("Store not found.".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"errors": {"message": "Store not found."}}));
    }

    #[tokio::test]
    async fn test_validation_envelope() {
        let mut errors = FieldErrors::new();
        errors.add("buyer_name", "This field is required.");
        let (status, body) = body_json(AppError::Validation(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"errors": {"buyer_name": ["This field is required."]}})
        );
    }

    #[tokio::test]
    async fn test_internal_detail_hidden() {
        let (status, body) = body_json(AppError::Internal("disk on fire".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["errors"]["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_unresolved_products_is_not_found() {
        let err: AppError = ServiceError::Unresolved(storekeep_core::Unresolved {
            missing: vec!["#7".to_string()],
        })
        .into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["errors"]["message"],
            "Some products were not found for this store."
        );
    }

    #[tokio::test]
    async fn test_weak_password_field() {
        let err = AppError::Auth(AuthError::WeakPassword(
            "password must be at least 8 characters".to_string(),
        ));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["errors"]["password"][0],
            "Password must be at least 8 characters."
        );
    }
}
