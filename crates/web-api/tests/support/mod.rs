//! In-memory-backed application state and request helpers for the HTTP flow
//! tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;

use application::{
    Authenticator, AuthenticatorDependencies, ChatService, ChatServiceDependencies, PasswordHasher,
    PasswordHasherError, ProfileService, ProfileServiceDependencies, SessionService,
    SessionServiceDependencies, SystemClock, TokenGenerator,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use domain::{
    AuthToken, AuthTokenRepository, ChatRoom, ChatRoomRepository, Member, MemberId,
    MemberRepository, Message, MessageId, MessageRepository, NewMessage, Nickname, PasswordHash,
    RepositoryError, RepositoryFuture, RoomId, TokenKey,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tower::ServiceExt;
use uuid::Uuid;

use web_api::{router, AppState};

pub const ROOM_NAME: &str = "Global chat";

#[derive(Default)]
pub struct InMemoryMemberRepository {
    data: Arc<RwLock<HashMap<Uuid, Member>>>,
}

impl MemberRepository for InMemoryMemberRepository {
    fn create(&self, member: Member) -> RepositoryFuture<Member> {
        let repo = self.data.clone();
        Box::pin(async move {
            let mut guard = repo.write().await;
            if guard.values().any(|m| m.nickname == member.nickname) {
                return Err(RepositoryError::Conflict);
            }
            let stored = member.clone();
            guard.insert(Uuid::from(member.id), member);
            Ok(stored)
        })
    }

    fn update(&self, member: Member) -> RepositoryFuture<Member> {
        let repo = self.data.clone();
        Box::pin(async move {
            let mut guard = repo.write().await;
            let id = Uuid::from(member.id);
            if !guard.contains_key(&id) {
                return Err(RepositoryError::NotFound);
            }
            if guard
                .values()
                .any(|m| m.nickname == member.nickname && m.id != member.id)
            {
                return Err(RepositoryError::Conflict);
            }
            let stored = member.clone();
            guard.insert(id, member);
            Ok(stored)
        })
    }

    fn find_by_id(&self, id: MemberId) -> RepositoryFuture<Option<Member>> {
        let repo = self.data.clone();
        Box::pin(async move {
            let guard = repo.read().await;
            Ok(guard.get(&Uuid::from(id)).cloned())
        })
    }

    fn find_by_nickname(&self, nickname: Nickname) -> RepositoryFuture<Option<Member>> {
        let repo = self.data.clone();
        Box::pin(async move {
            let guard = repo.read().await;
            Ok(guard.values().find(|m| m.nickname == nickname).cloned())
        })
    }
}

#[derive(Default)]
pub struct InMemoryAuthTokenRepository {
    data: Arc<RwLock<HashMap<String, AuthToken>>>,
}

impl AuthTokenRepository for InMemoryAuthTokenRepository {
    fn create(&self, token: AuthToken) -> RepositoryFuture<AuthToken> {
        let repo = self.data.clone();
        Box::pin(async move {
            let mut guard = repo.write().await;
            if guard.contains_key(token.key.as_str()) {
                return Err(RepositoryError::Conflict);
            }
            let stored = token.clone();
            guard.insert(token.key.as_str().to_owned(), token);
            Ok(stored)
        })
    }

    fn find_by_key(&self, key: TokenKey) -> RepositoryFuture<Option<AuthToken>> {
        let repo = self.data.clone();
        Box::pin(async move {
            let guard = repo.read().await;
            Ok(guard.get(key.as_str()).cloned())
        })
    }

    fn find_latest_for_member(&self, member_id: MemberId) -> RepositoryFuture<Option<AuthToken>> {
        let repo = self.data.clone();
        Box::pin(async move {
            let guard = repo.read().await;
            Ok(guard
                .values()
                .filter(|t| t.member_id == member_id)
                .max_by_key(|t| t.created_at)
                .cloned())
        })
    }

    fn delete(&self, key: TokenKey) -> RepositoryFuture<()> {
        let repo = self.data.clone();
        Box::pin(async move {
            let mut guard = repo.write().await;
            guard.remove(key.as_str());
            Ok(())
        })
    }
}

#[derive(Default)]
pub struct InMemoryChatRoomRepository {
    rooms: Arc<RwLock<HashMap<String, ChatRoom>>>,
}

impl ChatRoomRepository for InMemoryChatRoomRepository {
    fn get_or_create(&self, room: ChatRoom) -> RepositoryFuture<ChatRoom> {
        let repo = self.rooms.clone();
        Box::pin(async move {
            let mut guard = repo.write().await;
            if let Some(existing) = guard.get(&room.name) {
                return Ok(existing.clone());
            }
            let stored = room.clone();
            guard.insert(room.name.clone(), room);
            Ok(stored)
        })
    }

    fn find_by_name(&self, name: String) -> RepositoryFuture<Option<ChatRoom>> {
        let repo = self.rooms.clone();
        Box::pin(async move {
            let guard = repo.read().await;
            Ok(guard.get(&name).cloned())
        })
    }
}

#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: Arc<RwLock<Vec<Message>>>,
    next_id: Arc<AtomicI64>,
}

impl MessageRepository for InMemoryMessageRepository {
    fn create(&self, message: NewMessage) -> RepositoryFuture<Message> {
        let repo = self.messages.clone();
        let next_id = self.next_id.clone();
        Box::pin(async move {
            let id = MessageId::from(next_id.fetch_add(1, Ordering::SeqCst) + 1);
            let stored = Message::stored(id, message);
            repo.write().await.push(stored.clone());
            Ok(stored)
        })
    }

    fn list_after(
        &self,
        room_id: RoomId,
        after: Option<MessageId>,
        limit: u32,
    ) -> RepositoryFuture<Vec<Message>> {
        let repo = self.messages.clone();
        Box::pin(async move {
            let guard = repo.read().await;
            let mut items: Vec<Message> = guard
                .iter()
                .filter(|m| m.room_id == room_id)
                .filter(|m| after.map_or(true, |cursor| m.id > cursor))
                .cloned()
                .collect();
            items.sort_by_key(|m| (m.created_at, m.id));
            items.truncate(limit as usize);
            Ok(items)
        })
    }
}

/// Marker-prefix "hashing" so the flow tests stay fast.
pub struct PlainPasswordHasher;

#[async_trait::async_trait]
impl PasswordHasher for PlainPasswordHasher {
    async fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        PasswordHash::new(format!("plain:{plaintext}"))
            .map_err(|err| PasswordHasherError::hash_error(err.to_string()))
    }

    async fn verify(
        &self,
        plaintext: &str,
        hashed: &PasswordHash,
    ) -> Result<bool, PasswordHasherError> {
        Ok(hashed.as_str() == format!("plain:{plaintext}"))
    }
}

#[derive(Default)]
pub struct SequentialTokenGenerator {
    next: AtomicU64,
}

impl TokenGenerator for SequentialTokenGenerator {
    fn generate(&self) -> TokenKey {
        let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
        TokenKey::parse(format!("{n:040x}")).expect("sequential key is valid hex")
    }
}

pub fn test_router() -> Router {
    let member_repo = Arc::new(InMemoryMemberRepository::default());
    let token_repo = Arc::new(InMemoryAuthTokenRepository::default());
    let room_repo = Arc::new(InMemoryChatRoomRepository::default());
    let message_repo = Arc::new(InMemoryMessageRepository::default());
    let password_hasher = Arc::new(PlainPasswordHasher);
    let token_generator = Arc::new(SequentialTokenGenerator::default());
    let clock = Arc::new(SystemClock);

    let session_service = Arc::new(SessionService::new(SessionServiceDependencies {
        member_repository: member_repo.clone(),
        token_repository: token_repo.clone(),
        password_hasher: password_hasher.clone(),
        token_generator,
        clock: clock.clone(),
    }));

    let chat_service = Arc::new(ChatService::new(
        ChatServiceDependencies {
            room_repository: room_repo,
            message_repository: message_repo,
            clock: clock.clone(),
        },
        ROOM_NAME,
    ));

    let profile_service = Arc::new(ProfileService::new(ProfileServiceDependencies {
        member_repository: member_repo.clone(),
        password_hasher,
        clock,
    }));

    let authenticator = Arc::new(Authenticator::new(AuthenticatorDependencies {
        token_repository: token_repo,
        member_repository: member_repo,
    }));

    let state = AppState::new(session_service, chat_service, profile_service, authenticator);
    router(state)
}

pub async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = serde_json::from_slice(&body_bytes).unwrap_or(json!({}));
    (status, body)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_json_request(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Token {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn authed_get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Token {token}"))
        .body(Body::empty())
        .unwrap()
}

/// Registers a member and hands back the token plus the member body.
pub async fn register(app: &Router, nickname: &str, password: &str) -> (String, Value) {
    let (status, body) = send_request(
        app,
        json_request(
            "POST",
            "/register",
            json!({ "nickname": nickname, "password": password }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    let token = body["token"].as_str().expect("token").to_owned();
    (token, body["member"].clone())
}
