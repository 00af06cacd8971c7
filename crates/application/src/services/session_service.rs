use std::sync::Arc;

use domain::{
    AuthToken, AuthTokenRepository, Member, MemberId, MemberRepository, Nickname, RepositoryError,
    TokenKey, ValidationError,
};
use uuid::Uuid;

use crate::{
    clock::Clock, dto::SessionDto, error::ApplicationError, password::PasswordHasher,
    token::TokenGenerator,
};

#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub nickname: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub nickname: String,
    pub password: String,
}

pub struct SessionServiceDependencies {
    pub member_repository: Arc<dyn MemberRepository>,
    pub token_repository: Arc<dyn AuthTokenRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub token_generator: Arc<dyn TokenGenerator>,
    pub clock: Arc<dyn Clock>,
}

pub struct SessionService {
    deps: SessionServiceDependencies,
}

impl SessionService {
    pub fn new(deps: SessionServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<SessionDto, ApplicationError> {
        let nickname = Nickname::parse(request.nickname)?;
        if request.password.is_empty() {
            return Err(ValidationError::invalid_argument("password", "cannot be blank").into());
        }

        // Fast-path check for a friendlier error; the unique constraint on
        // insert remains the authority under concurrent registrations.
        if self
            .deps
            .member_repository
            .find_by_nickname(nickname.clone())
            .await?
            .is_some()
        {
            return Err(ValidationError::DuplicateNickname.into());
        }

        let password = self.deps.password_hasher.hash(&request.password).await?;
        let now = self.deps.clock.now();
        let member = Member::register(MemberId::from(Uuid::new_v4()), nickname, password, now);

        let member = match self.deps.member_repository.create(member).await {
            Ok(member) => member,
            Err(RepositoryError::Conflict) => {
                return Err(ValidationError::DuplicateNickname.into())
            }
            Err(err) => return Err(err.into()),
        };

        let token = self.issue_token(member.id).await?;
        tracing::info!(member_id = %member.id, "member registered");
        Ok(SessionDto::new(token, &member))
    }

    pub async fn login(&self, request: LoginRequest) -> Result<SessionDto, ApplicationError> {
        // A nickname that cannot even parse matches no member; report the
        // same error as a hash mismatch so callers cannot probe for members.
        let nickname =
            Nickname::parse(request.nickname).map_err(|_| ValidationError::InvalidCredentials)?;
        let member = self
            .deps
            .member_repository
            .find_by_nickname(nickname)
            .await?
            .ok_or(ValidationError::InvalidCredentials)?;

        let password_ok = self
            .deps
            .password_hasher
            .verify(&request.password, &member.password)
            .await?;
        if !password_ok {
            return Err(ValidationError::InvalidCredentials.into());
        }

        let token = match self
            .deps
            .token_repository
            .find_latest_for_member(member.id)
            .await?
        {
            Some(existing) => existing,
            None => self.issue_token(member.id).await?,
        };

        Ok(SessionDto::new(token, &member))
    }

    /// Deletes the presented token. Already-deleted tokens are a no-op, so a
    /// repeated logout still succeeds.
    pub async fn logout(&self, key: TokenKey) -> Result<(), ApplicationError> {
        self.deps.token_repository.delete(key).await?;
        Ok(())
    }

    async fn issue_token(&self, member_id: MemberId) -> Result<AuthToken, ApplicationError> {
        let token = AuthToken::issue(
            self.deps.token_generator.generate(),
            member_id,
            self.deps.clock.now(),
        );
        Ok(self.deps.token_repository.create(token).await?)
    }
}
