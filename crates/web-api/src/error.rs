use application::{ApplicationError, AuthError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{RepositoryError, ValidationError};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    /// Set for validation failures that concern one input field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
                field: None,
            },
        }
    }

    pub fn validation(
        code: &'static str,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                code,
                message: message.into(),
                field: Some(field.into()),
            },
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn unauthorized(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Validation(validation) => match validation {
                ValidationError::InvalidArgument { field, reason } => {
                    ApiError::validation("INVALID_ARGUMENT", field.clone(), format!("{field}: {reason}"))
                }
                ValidationError::DuplicateNickname => {
                    ApiError::validation("DUPLICATE_NICKNAME", "nickname", "nickname is already taken")
                }
                ValidationError::InvalidCredentials => {
                    ApiError::bad_request("INVALID_CREDENTIALS", "invalid nickname or password")
                }
                ValidationError::EmptyText => {
                    ApiError::validation("EMPTY_TEXT", "text", "message text cannot be empty")
                }
                ValidationError::WrongOldPassword => ApiError::validation(
                    "WRONG_OLD_PASSWORD",
                    "old_password",
                    "old password does not match",
                ),
            },
            ApplicationError::Repository(repo) => repository_error(repo),
            ApplicationError::Password(err) => {
                tracing::error!(error = %err, "password hashing failed");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PASSWORD_ERROR",
                    "password processing failed",
                )
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Unauthenticated => {
                ApiError::unauthorized("UNAUTHENTICATED", "authentication required")
            }
            AuthError::Malformed => ApiError::unauthorized(
                "INVALID_AUTHORIZATION",
                "invalid authorization header, expected \"Token <key>\"",
            ),
            AuthError::InvalidToken => ApiError::unauthorized("INVALID_TOKEN", "invalid token"),
            AuthError::Repository(repo) => repository_error(repo),
        }
    }
}

fn repository_error(error: RepositoryError) -> ApiError {
    match error {
        RepositoryError::NotFound => ApiError::new(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "requested resource not found",
        ),
        RepositoryError::Conflict => ApiError::new(
            StatusCode::CONFLICT,
            "CONFLICT",
            "resource already exists",
        ),
        RepositoryError::Storage { message } => {
            tracing::error!(error = %message, "storage failure");
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                format!("database error: {message}"),
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
