use std::sync::Arc;

use domain::{MemberId, MemberRepository, RepositoryError, ValidationError};
use uuid::Uuid;

use crate::error::ApplicationError;
use crate::password::PasswordHasher;
use crate::services::tests::{
    register_member, InMemoryAuthTokenRepository, InMemoryMemberRepository, PlainPasswordHasher,
    TickingClock,
};
use crate::services::{ProfileService, ProfileServiceDependencies, UpdateProfileRequest};

struct Fixture {
    service: ProfileService,
    members: Arc<InMemoryMemberRepository>,
    tokens: Arc<InMemoryAuthTokenRepository>,
}

fn fixture() -> Fixture {
    let members = Arc::new(InMemoryMemberRepository::new());
    let tokens = Arc::new(InMemoryAuthTokenRepository::new());
    let service = ProfileService::new(ProfileServiceDependencies {
        member_repository: members.clone(),
        password_hasher: Arc::new(PlainPasswordHasher),
        clock: Arc::new(TickingClock::default()),
    });
    Fixture {
        service,
        members,
        tokens,
    }
}

fn nickname_change(nickname: &str) -> UpdateProfileRequest {
    UpdateProfileRequest {
        nickname: Some(nickname.to_owned()),
        ..Default::default()
    }
}

fn password_change(new_password: &str, old_password: Option<&str>) -> UpdateProfileRequest {
    UpdateProfileRequest {
        new_password: Some(new_password.to_owned()),
        old_password: old_password.map(str::to_owned),
        ..Default::default()
    }
}

#[tokio::test]
async fn get_returns_the_stored_member() {
    let fx = fixture();
    let (member, _) = register_member(&fx.members, &fx.tokens, "ada", "pw").await;

    let fetched = fx.service.get(member.id).await.unwrap();
    assert_eq!(fetched.id, member.id);
    assert_eq!(fetched.nickname.as_str(), "ada");
}

#[tokio::test]
async fn get_unknown_member_is_not_found() {
    let fx = fixture();
    let result = fx.service.get(MemberId::from(Uuid::new_v4())).await;
    match result.unwrap_err() {
        ApplicationError::Repository(RepositoryError::NotFound) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn nickname_can_be_changed() {
    let fx = fixture();
    let (member, _) = register_member(&fx.members, &fx.tokens, "ada", "pw").await;

    let updated = fx
        .service
        .update(member.clone(), nickname_change("grace"))
        .await
        .unwrap();
    assert_eq!(updated.nickname.as_str(), "grace");

    let stored = fx.members.find_by_id(member.id).await.unwrap().unwrap();
    assert_eq!(stored.nickname.as_str(), "grace");
}

#[tokio::test]
async fn nickname_held_by_another_member_is_rejected() {
    let fx = fixture();
    register_member(&fx.members, &fx.tokens, "ada", "pw").await;
    let (other, _) = register_member(&fx.members, &fx.tokens, "grace", "pw").await;

    let result = fx.service.update(other, nickname_change("ada")).await;
    match result.unwrap_err() {
        ApplicationError::Validation(ValidationError::DuplicateNickname) => {}
        other => panic!("expected DuplicateNickname, got {other:?}"),
    }
}

#[tokio::test]
async fn keeping_the_current_nickname_is_allowed() {
    let fx = fixture();
    let (member, _) = register_member(&fx.members, &fx.tokens, "ada", "pw").await;

    let updated = fx.service.update(member, nickname_change("ada")).await.unwrap();
    assert_eq!(updated.nickname.as_str(), "ada");
}

#[tokio::test]
async fn password_change_with_correct_old_password() {
    let fx = fixture();
    let (member, _) = register_member(&fx.members, &fx.tokens, "ada", "old-pw").await;

    fx.service
        .update(member.clone(), password_change("new-pw", Some("old-pw")))
        .await
        .unwrap();

    let stored = fx.members.find_by_id(member.id).await.unwrap().unwrap();
    let hasher = PlainPasswordHasher;
    assert!(hasher.verify("new-pw", &stored.password).await.unwrap());
    assert!(!hasher.verify("old-pw", &stored.password).await.unwrap());
}

#[tokio::test]
async fn wrong_old_password_leaves_hash_untouched() {
    let fx = fixture();
    let (member, _) = register_member(&fx.members, &fx.tokens, "ada", "old-pw").await;

    let result = fx
        .service
        .update(member.clone(), password_change("new-pw", Some("nope")))
        .await;
    match result.unwrap_err() {
        ApplicationError::Validation(ValidationError::WrongOldPassword) => {}
        other => panic!("expected WrongOldPassword, got {other:?}"),
    }

    let stored = fx.members.find_by_id(member.id).await.unwrap().unwrap();
    let hasher = PlainPasswordHasher;
    assert!(hasher.verify("old-pw", &stored.password).await.unwrap());
}

#[tokio::test]
async fn omitted_old_password_permits_the_change() {
    let fx = fixture();
    let (member, _) = register_member(&fx.members, &fx.tokens, "ada", "old-pw").await;

    fx.service
        .update(member.clone(), password_change("new-pw", None))
        .await
        .unwrap();

    let stored = fx.members.find_by_id(member.id).await.unwrap().unwrap();
    let hasher = PlainPasswordHasher;
    assert!(hasher.verify("new-pw", &stored.password).await.unwrap());
}

#[tokio::test]
async fn blank_old_password_permits_the_change() {
    let fx = fixture();
    let (member, _) = register_member(&fx.members, &fx.tokens, "ada", "old-pw").await;

    fx.service
        .update(member.clone(), password_change("new-pw", Some("")))
        .await
        .unwrap();

    let stored = fx.members.find_by_id(member.id).await.unwrap().unwrap();
    let hasher = PlainPasswordHasher;
    assert!(hasher.verify("new-pw", &stored.password).await.unwrap());
}

#[tokio::test]
async fn blank_new_password_changes_nothing() {
    let fx = fixture();
    let (member, _) = register_member(&fx.members, &fx.tokens, "ada", "old-pw").await;

    fx.service
        .update(member.clone(), password_change("   ", Some("old-pw")))
        .await
        .unwrap();

    let stored = fx.members.find_by_id(member.id).await.unwrap().unwrap();
    let hasher = PlainPasswordHasher;
    assert!(hasher.verify("old-pw", &stored.password).await.unwrap());
}

#[tokio::test]
async fn empty_update_is_a_no_op() {
    let fx = fixture();
    let (member, _) = register_member(&fx.members, &fx.tokens, "ada", "pw").await;

    let updated = fx
        .service
        .update(member.clone(), UpdateProfileRequest::default())
        .await
        .unwrap();
    assert_eq!(updated.nickname, member.nickname);
    assert_eq!(updated.password, member.password);
}
