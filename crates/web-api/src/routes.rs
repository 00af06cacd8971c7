use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use application::{
    LoginRequest, MemberDto, MessageDto, PostMessageRequest, RegisterRequest, SessionDto,
    UpdateProfileRequest,
};
use domain::{MessageAuthor, MessageId, Timestamp};

use crate::{auth::CurrentSession, error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
struct CredentialsPayload {
    nickname: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct PostMessagePayload {
    text: String,
}

/// Raw query parameters. Values that do not parse as integers are ignored
/// rather than rejected, so both fields arrive as plain strings.
#[derive(Debug, Default, Deserialize)]
struct ListMessagesQuery {
    after_id: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProfilePayload {
    nickname: Option<String>,
    new_password: Option<String>,
    old_password: Option<String>,
}

impl From<ProfilePayload> for UpdateProfileRequest {
    fn from(payload: ProfilePayload) -> Self {
        Self {
            nickname: payload.nickname,
            new_password: payload.new_password,
            old_password: payload.old_password,
        }
    }
}

#[derive(Debug, Serialize)]
struct HelloResponse {
    message: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    timestamp: Timestamp,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/hello", get(hello))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
        .route("/logout", post(logout))
        .route("/chat/messages", get(list_messages).post(post_message))
        .route(
            "/profile",
            get(profile).put(replace_profile).patch(update_profile),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn hello() -> Json<HelloResponse> {
    Json(HelloResponse {
        message: "Hello!",
        timestamp: time::OffsetDateTime::now_utc(),
    })
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<(StatusCode, Json<SessionDto>), ApiError> {
    let dto = state
        .session_service
        .register(RegisterRequest {
            nickname: payload.nickname,
            password: payload.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(dto)))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsPayload>,
) -> Result<Json<SessionDto>, ApiError> {
    let dto = state
        .session_service
        .login(LoginRequest {
            nickname: payload.nickname,
            password: payload.password,
        })
        .await?;

    Ok(Json(dto))
}

async fn me(session: CurrentSession) -> Json<MemberDto> {
    Json(MemberDto::from(&session.member))
}

async fn logout(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<StatusCode, ApiError> {
    state.session_service.logout(session.token.key).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_messages(
    State(state): State<AppState>,
    _session: CurrentSession,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let after = query
        .after_id
        .as_deref()
        .and_then(|value| value.parse::<i64>().ok())
        .map(MessageId::from);
    let limit = query
        .limit
        .as_deref()
        .and_then(|value| value.parse::<i64>().ok());

    let messages = state.chat_service.list_messages(after, limit).await?;
    Ok(Json(messages.into_iter().map(MessageDto::from).collect()))
}

async fn post_message(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(payload): Json<PostMessagePayload>,
) -> Result<(StatusCode, Json<MessageDto>), ApiError> {
    let message = state
        .chat_service
        .post_message(PostMessageRequest {
            author: MessageAuthor::from(&session.member),
            text: payload.text,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(MessageDto::from(message))))
}

async fn profile(
    State(state): State<AppState>,
    session: CurrentSession,
) -> Result<Json<MemberDto>, ApiError> {
    let member = state.profile_service.get(session.member.id).await?;
    Ok(Json(MemberDto::from(&member)))
}

/// PUT requires the entity's mandatory field; PATCH below applies whatever
/// was supplied.
async fn replace_profile(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(payload): Json<ProfilePayload>,
) -> Result<Json<MemberDto>, ApiError> {
    if payload.nickname.is_none() {
        return Err(ApiError::validation(
            "INVALID_ARGUMENT",
            "nickname",
            "nickname is required",
        ));
    }
    apply_profile_update(&state, session, payload).await
}

async fn update_profile(
    State(state): State<AppState>,
    session: CurrentSession,
    Json(payload): Json<ProfilePayload>,
) -> Result<Json<MemberDto>, ApiError> {
    apply_profile_update(&state, session, payload).await
}

async fn apply_profile_update(
    state: &AppState,
    session: CurrentSession,
    payload: ProfilePayload,
) -> Result<Json<MemberDto>, ApiError> {
    let member = state
        .profile_service
        .update(session.member, payload.into())
        .await?;
    Ok(Json(MemberDto::from(&member)))
}
