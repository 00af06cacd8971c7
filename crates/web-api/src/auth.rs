use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use domain::{AuthToken, Member};

use crate::{error::ApiError, state::AppState};

/// The authenticated caller, resolved from the `Authorization` header. Routes
/// that take this extractor reject unauthenticated requests with 401; the
/// identity is passed to the handler as a plain value.
pub struct CurrentSession {
    pub member: Member,
    pub token: AuthToken,
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        let (member, token) = state.authenticator.require(header).await?;
        Ok(Self { member, token })
    }
}
