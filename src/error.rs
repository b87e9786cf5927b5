//! Error types for the library console

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::{client::ApiError, models::LendingStatus};

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Cannot change lending status from {from} to {to}")]
    InvalidTransition {
        from: LendingStatus,
        to: LendingStatus,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            AppError::Api(e) => {
                let status = match e {
                    ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                    ApiError::NotFound => StatusCode::NOT_FOUND,
                    _ => {
                        tracing::error!("Remote API failure: {}", e);
                        StatusCode::BAD_GATEWAY
                    }
                };
                (status, "Api", e.to_string())
            }
            AppError::Authentication(msg) => (StatusCode::UNAUTHORIZED, "Authentication", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "Validation", msg.clone()),
            AppError::InvalidTransition { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "InvalidTransition", self.to_string())
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "Conflict", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BadRequest", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PayloadTooLarge", msg.clone())
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: kind.to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Surfaces one message: struct-level (`__all__`) rules first, then fields by name
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| (field.to_string() != "__all__", field.to_string()));

        let message = fields
            .iter()
            .flat_map(|(_, errs)| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());
        AppError::Validation(message)
    }
}

/// Result type alias for console operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Form {
        #[validate(length(min = 1, message = "Please fill in all fields"))]
        name: String,
    }

    #[test]
    fn test_validation_message_is_surfaced() {
        let errors = Form { name: String::new() }.validate().unwrap_err();
        match AppError::from(errors) {
            AppError::Validation(msg) => assert_eq!(msg, "Please fill in all fields"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[derive(Validate)]
    #[validate(schema(function = "always_fails", skip_on_field_errors = false))]
    struct Signup {
        #[validate(length(min = 1, message = "Please fill in all fields"))]
        zname: String,
        #[validate(length(min = 1, message = "Please enter an email"))]
        email: String,
    }

    #[derive(Validate)]
    struct Contact {
        #[validate(length(min = 1, message = "Please fill in all fields"))]
        zname: String,
        #[validate(length(min = 1, message = "Please enter an email"))]
        email: String,
    }

    fn always_fails(_: &Signup) -> Result<(), validator::ValidationError> {
        let mut error = validator::ValidationError::new("mismatch");
        error.message = Some("Passwords don't match!".into());
        Err(error)
    }

    #[test]
    fn test_validation_precedence_is_stable() {
        for _ in 0..50 {
            let form = Signup {
                zname: String::new(),
                email: String::new(),
            };
            match AppError::from(form.validate().unwrap_err()) {
                AppError::Validation(msg) => assert_eq!(msg, "Passwords don't match!"),
                other => panic!("unexpected error: {:?}", other),
            }
        }

        let form = Contact {
            zname: String::new(),
            email: String::new(),
        };
        match AppError::from(form.validate().unwrap_err()) {
            AppError::Validation(msg) => assert_eq!(msg, "Please enter an email"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::Api(ApiError::NotFound), StatusCode::NOT_FOUND),
            (
                AppError::Api(ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
                StatusCode::BAD_GATEWAY,
            ),
            (
                AppError::InvalidTransition {
                    from: LendingStatus::Returned,
                    to: LendingStatus::Borrowed,
                },
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (AppError::Conflict("busy".into()), StatusCode::CONFLICT),
            (AppError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (AppError::PayloadTooLarge("big".into()), StatusCode::PAYLOAD_TOO_LARGE),
        ];

        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
