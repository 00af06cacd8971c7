//! Service entry point: configuration, database pool, dependency wiring, and
//! the Axum server.

use std::sync::Arc;

use application::{
    Authenticator, AuthenticatorDependencies, ChatService, ChatServiceDependencies,
    ProfileService, ProfileServiceDependencies, RandomTokenGenerator, SessionService,
    SessionServiceDependencies, SystemClock,
};
use config::AppConfig;
use infrastructure::{
    create_pg_pool, BcryptPasswordHasher, PgAuthTokenRepository, PgChatRoomRepository,
    PgMemberRepository, PgMessageRepository,
};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env_with_defaults();
    config.validate()?;

    tracing::info!(
        database = config.database.url.split('@').next_back().unwrap_or("unknown"),
        "connecting to database"
    );
    let pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    let member_repository = Arc::new(PgMemberRepository::new(pool.clone()));
    let token_repository = Arc::new(PgAuthTokenRepository::new(pool.clone()));
    let room_repository = Arc::new(PgChatRoomRepository::new(pool.clone()));
    let message_repository = Arc::new(PgMessageRepository::new(pool));

    let password_hasher = Arc::new(BcryptPasswordHasher::new(config.server.bcrypt_cost));
    let clock = Arc::new(SystemClock);
    let token_generator = Arc::new(RandomTokenGenerator);

    let session_service = Arc::new(SessionService::new(SessionServiceDependencies {
        member_repository: member_repository.clone(),
        token_repository: token_repository.clone(),
        password_hasher: password_hasher.clone(),
        token_generator,
        clock: clock.clone(),
    }));

    let chat_service = Arc::new(ChatService::new(
        ChatServiceDependencies {
            room_repository,
            message_repository,
            clock: clock.clone(),
        },
        config.chat.room_name.clone(),
    ));

    let profile_service = Arc::new(ProfileService::new(ProfileServiceDependencies {
        member_repository: member_repository.clone(),
        password_hasher,
        clock,
    }));

    let authenticator = Arc::new(Authenticator::new(AuthenticatorDependencies {
        token_repository,
        member_repository,
    }));

    let state = AppState::new(session_service, chat_service, profile_service, authenticator);
    let app = router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(room = %config.chat.room_name, "chat server listening on http://{addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
