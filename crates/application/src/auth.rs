use std::sync::Arc;

use domain::{AuthToken, AuthTokenRepository, Member, MemberRepository, RepositoryError, TokenKey};
use thiserror::Error;

/// Header keyword, compared case-sensitively: `Authorization: Token <key>`.
pub const AUTH_SCHEME: &str = "Token";

#[derive(Debug, Error)]
pub enum AuthError {
    /// No credentials were presented on a route that requires them.
    #[error("authentication required")]
    Unauthenticated,
    /// The header was present but not of the form `Token <key>`.
    #[error("invalid authorization header, expected \"Token <key>\"")]
    Malformed,
    /// The key does not resolve to a live token.
    #[error("invalid token")]
    InvalidToken,
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

pub struct AuthenticatorDependencies {
    pub token_repository: Arc<dyn AuthTokenRepository>,
    pub member_repository: Arc<dyn MemberRepository>,
}

/// Resolves an `Authorization` header value into the owning member and the
/// presented token.
pub struct Authenticator {
    deps: AuthenticatorDependencies,
}

impl Authenticator {
    pub fn new(deps: AuthenticatorDependencies) -> Self {
        Self { deps }
    }

    /// An absent header is not an error: it yields `Ok(None)` and the caller
    /// decides whether credentials were required.
    pub async fn authenticate(
        &self,
        header: Option<&str>,
    ) -> Result<Option<(Member, AuthToken)>, AuthError> {
        let Some(value) = header else {
            return Ok(None);
        };

        let parts: Vec<&str> = value.split_whitespace().collect();
        let &[scheme, key] = parts.as_slice() else {
            return Err(AuthError::Malformed);
        };
        if scheme != AUTH_SCHEME {
            return Err(AuthError::Malformed);
        }

        let key = TokenKey::parse(key).map_err(|_| AuthError::InvalidToken)?;
        let token = self
            .deps
            .token_repository
            .find_by_key(key)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        let member = self
            .deps
            .member_repository
            .find_by_id(token.member_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok(Some((member, token)))
    }

    /// Like [`authenticate`](Self::authenticate), but an absent header fails
    /// with [`AuthError::Unauthenticated`].
    pub async fn require(&self, header: Option<&str>) -> Result<(Member, AuthToken), AuthError> {
        self.authenticate(header)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }
}
