use std::sync::Arc;

use domain::{
    Member, MemberId, MemberRepository, Nickname, RepositoryError, ValidationError,
};

use crate::{clock::Clock, error::ApplicationError, password::PasswordHasher};

/// Fields a member may change about themselves. `None` leaves a field
/// untouched; blank strings count as absent for the password fields.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileRequest {
    pub nickname: Option<String>,
    pub new_password: Option<String>,
    pub old_password: Option<String>,
}

pub struct ProfileServiceDependencies {
    pub member_repository: Arc<dyn MemberRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
    pub clock: Arc<dyn Clock>,
}

pub struct ProfileService {
    deps: ProfileServiceDependencies,
}

impl ProfileService {
    pub fn new(deps: ProfileServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn get(&self, member_id: MemberId) -> Result<Member, ApplicationError> {
        self.deps
            .member_repository
            .find_by_id(member_id)
            .await?
            .ok_or(ApplicationError::Repository(RepositoryError::NotFound))
    }

    pub async fn update(
        &self,
        member: Member,
        request: UpdateProfileRequest,
    ) -> Result<Member, ApplicationError> {
        let mut member = member;
        let now = self.deps.clock.now();

        if let Some(nickname) = request.nickname {
            let nickname = Nickname::parse(nickname)?;
            if nickname != member.nickname {
                // Fast-path check, excluding the member itself. The unique
                // constraint on write still backstops races.
                if let Some(other) = self
                    .deps
                    .member_repository
                    .find_by_nickname(nickname.clone())
                    .await?
                {
                    if other.id != member.id {
                        return Err(ValidationError::DuplicateNickname.into());
                    }
                }
                member.rename(nickname, now);
            }
        }

        let new_password = request.new_password.filter(|p| !p.trim().is_empty());
        if let Some(new_password) = new_password {
            // TODO: require old_password unconditionally once the deployed
            // clients all send it; a blank old_password currently skips
            // verification.
            if let Some(old_password) = request.old_password.filter(|p| !p.is_empty()) {
                let old_ok = self
                    .deps
                    .password_hasher
                    .verify(&old_password, &member.password)
                    .await?;
                if !old_ok {
                    return Err(ValidationError::WrongOldPassword.into());
                }
            }
            let hashed = self.deps.password_hasher.hash(&new_password).await?;
            member.set_password(hashed, now);
        }

        match self.deps.member_repository.update(member).await {
            Ok(updated) => Ok(updated),
            Err(RepositoryError::Conflict) => Err(ValidationError::DuplicateNickname.into()),
            Err(err) => Err(err.into()),
        }
    }
}
