use thiserror::Error;

/// Input and business-rule rejections surfaced to the caller as 400-class
/// failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    #[error("nickname is already taken")]
    DuplicateNickname,

    #[error("invalid nickname or password")]
    InvalidCredentials,

    #[error("message text cannot be empty")]
    EmptyText,

    #[error("old password does not match")]
    WrongOldPassword,
}

impl ValidationError {
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failures reported by a repository implementation. `Conflict` is how a
/// unique-constraint rejection reaches the services; they translate it into
/// the matching [`ValidationError`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("conflicting record already exists")]
    Conflict,

    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepositoryError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}
