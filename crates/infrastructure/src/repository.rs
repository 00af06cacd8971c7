//! PostgreSQL repositories. Each method clones the pool into a `'static`
//! future, so the repository handles stay cheaply cloneable and `Send`.

use domain::{
    AuthToken, AuthTokenRepository, ChatRoom, ChatRoomRepository, Member, MemberId,
    MemberRepository, Message, MessageId, MessageRepository, NewMessage, Nickname, PasswordHash,
    RepositoryError, RepositoryFuture, RoomId, TokenKey,
};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

pub async fn create_pg_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::RowNotFound => RepositoryError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::Conflict,
        _ => RepositoryError::storage(err.to_string()),
    }
}

fn invalid_data(message: impl Into<String>) -> RepositoryError {
    RepositoryError::storage(message)
}

#[derive(Debug, FromRow)]
struct MemberRecord {
    id: Uuid,
    nickname: String,
    password_hash: String,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

impl TryFrom<MemberRecord> for Member {
    type Error = RepositoryError;

    fn try_from(value: MemberRecord) -> Result<Self, Self::Error> {
        let nickname =
            Nickname::parse(value.nickname).map_err(|err| invalid_data(err.to_string()))?;
        let password =
            PasswordHash::new(value.password_hash).map_err(|err| invalid_data(err.to_string()))?;
        Ok(Member {
            id: MemberId::from(value.id),
            nickname,
            password,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct TokenRecord {
    key: String,
    member_id: Uuid,
    created_at: OffsetDateTime,
}

impl TryFrom<TokenRecord> for AuthToken {
    type Error = RepositoryError;

    fn try_from(value: TokenRecord) -> Result<Self, Self::Error> {
        let key = TokenKey::parse(value.key).map_err(|err| invalid_data(err.to_string()))?;
        Ok(AuthToken {
            key,
            member_id: MemberId::from(value.member_id),
            created_at: value.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct RoomRecord {
    id: Uuid,
    name: String,
    created_at: OffsetDateTime,
}

impl From<RoomRecord> for ChatRoom {
    fn from(value: RoomRecord) -> Self {
        ChatRoom {
            id: RoomId::from(value.id),
            name: value.name,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct MessageRecord {
    id: i64,
    room_id: Uuid,
    author_id: Uuid,
    author_nickname: String,
    text: String,
    created_at: OffsetDateTime,
}

impl TryFrom<MessageRecord> for Message {
    type Error = RepositoryError;

    fn try_from(value: MessageRecord) -> Result<Self, Self::Error> {
        let nickname =
            Nickname::parse(value.author_nickname).map_err(|err| invalid_data(err.to_string()))?;
        let text = domain::MessageText::parse(value.text)
            .map_err(|err| invalid_data(err.to_string()))?;
        Ok(Message {
            id: MessageId::from(value.id),
            room_id: RoomId::from(value.room_id),
            author: domain::MessageAuthor {
                id: MemberId::from(value.author_id),
                nickname,
            },
            text,
            created_at: value.created_at,
        })
    }
}

#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl MemberRepository for PgMemberRepository {
    fn create(&self, member: Member) -> RepositoryFuture<Member> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let record = sqlx::query_as::<_, MemberRecord>(
                r#"
                INSERT INTO members (id, nickname, password_hash, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, nickname, password_hash, created_at, updated_at
                "#,
            )
            .bind(Uuid::from(member.id))
            .bind(member.nickname.as_str())
            .bind(member.password.as_str())
            .bind(member.created_at)
            .bind(member.updated_at)
            .fetch_one(&pool)
            .await
            .map_err(map_sqlx_err)?;

            Member::try_from(record)
        })
    }

    fn update(&self, member: Member) -> RepositoryFuture<Member> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let record = sqlx::query_as::<_, MemberRecord>(
                r#"
                UPDATE members
                SET nickname = $2, password_hash = $3, updated_at = $4
                WHERE id = $1
                RETURNING id, nickname, password_hash, created_at, updated_at
                "#,
            )
            .bind(Uuid::from(member.id))
            .bind(member.nickname.as_str())
            .bind(member.password.as_str())
            .bind(member.updated_at)
            .fetch_one(&pool)
            .await
            .map_err(map_sqlx_err)?;

            Member::try_from(record)
        })
    }

    fn find_by_id(&self, id: MemberId) -> RepositoryFuture<Option<Member>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let record = sqlx::query_as::<_, MemberRecord>(
                r#"
                SELECT id, nickname, password_hash, created_at, updated_at
                FROM members
                WHERE id = $1
                "#,
            )
            .bind(Uuid::from(id))
            .fetch_optional(&pool)
            .await
            .map_err(map_sqlx_err)?;

            record.map(Member::try_from).transpose()
        })
    }

    fn find_by_nickname(&self, nickname: Nickname) -> RepositoryFuture<Option<Member>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let record = sqlx::query_as::<_, MemberRecord>(
                r#"
                SELECT id, nickname, password_hash, created_at, updated_at
                FROM members
                WHERE nickname = $1
                "#,
            )
            .bind(nickname.as_str())
            .fetch_optional(&pool)
            .await
            .map_err(map_sqlx_err)?;

            record.map(Member::try_from).transpose()
        })
    }
}

#[derive(Clone)]
pub struct PgAuthTokenRepository {
    pool: PgPool,
}

impl PgAuthTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl AuthTokenRepository for PgAuthTokenRepository {
    fn create(&self, token: AuthToken) -> RepositoryFuture<AuthToken> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let record = sqlx::query_as::<_, TokenRecord>(
                r#"
                INSERT INTO auth_tokens (key, member_id, created_at)
                VALUES ($1, $2, $3)
                RETURNING key, member_id, created_at
                "#,
            )
            .bind(token.key.as_str())
            .bind(Uuid::from(token.member_id))
            .bind(token.created_at)
            .fetch_one(&pool)
            .await
            .map_err(map_sqlx_err)?;

            AuthToken::try_from(record)
        })
    }

    fn find_by_key(&self, key: TokenKey) -> RepositoryFuture<Option<AuthToken>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let record = sqlx::query_as::<_, TokenRecord>(
                r#"
                SELECT key, member_id, created_at
                FROM auth_tokens
                WHERE key = $1
                "#,
            )
            .bind(key.as_str())
            .fetch_optional(&pool)
            .await
            .map_err(map_sqlx_err)?;

            record.map(AuthToken::try_from).transpose()
        })
    }

    fn find_latest_for_member(&self, member_id: MemberId) -> RepositoryFuture<Option<AuthToken>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let record = sqlx::query_as::<_, TokenRecord>(
                r#"
                SELECT key, member_id, created_at
                FROM auth_tokens
                WHERE member_id = $1
                ORDER BY created_at DESC
                LIMIT 1
                "#,
            )
            .bind(Uuid::from(member_id))
            .fetch_optional(&pool)
            .await
            .map_err(map_sqlx_err)?;

            record.map(AuthToken::try_from).transpose()
        })
    }

    fn delete(&self, key: TokenKey) -> RepositoryFuture<()> {
        let pool = self.pool.clone();
        Box::pin(async move {
            sqlx::query("DELETE FROM auth_tokens WHERE key = $1")
                .bind(key.as_str())
                .execute(&pool)
                .await
                .map_err(map_sqlx_err)?;
            Ok(())
        })
    }
}

#[derive(Clone)]
pub struct PgChatRoomRepository {
    pool: PgPool,
}

impl PgChatRoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ChatRoomRepository for PgChatRoomRepository {
    fn get_or_create(&self, room: ChatRoom) -> RepositoryFuture<ChatRoom> {
        let pool = self.pool.clone();
        Box::pin(async move {
            // ON CONFLICT DO NOTHING absorbs creation races on the unique
            // name; whichever row won is read back.
            let inserted = sqlx::query_as::<_, RoomRecord>(
                r#"
                INSERT INTO chat_rooms (id, name, created_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (name) DO NOTHING
                RETURNING id, name, created_at
                "#,
            )
            .bind(Uuid::from(room.id))
            .bind(&room.name)
            .bind(room.created_at)
            .fetch_optional(&pool)
            .await
            .map_err(map_sqlx_err)?;

            if let Some(record) = inserted {
                return Ok(record.into());
            }

            let record = sqlx::query_as::<_, RoomRecord>(
                "SELECT id, name, created_at FROM chat_rooms WHERE name = $1",
            )
            .bind(&room.name)
            .fetch_one(&pool)
            .await
            .map_err(map_sqlx_err)?;

            Ok(record.into())
        })
    }

    fn find_by_name(&self, name: String) -> RepositoryFuture<Option<ChatRoom>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let record = sqlx::query_as::<_, RoomRecord>(
                "SELECT id, name, created_at FROM chat_rooms WHERE name = $1",
            )
            .bind(&name)
            .fetch_optional(&pool)
            .await
            .map_err(map_sqlx_err)?;

            Ok(record.map(ChatRoom::from))
        })
    }
}

#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl MessageRepository for PgMessageRepository {
    fn create(&self, message: NewMessage) -> RepositoryFuture<Message> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let (id,): (i64,) = sqlx::query_as(
                r#"
                INSERT INTO messages (room_id, author_id, text, created_at)
                VALUES ($1, $2, $3, $4)
                RETURNING id
                "#,
            )
            .bind(Uuid::from(message.room_id))
            .bind(Uuid::from(message.author.id))
            .bind(message.text.as_str())
            .bind(message.created_at)
            .fetch_one(&pool)
            .await
            .map_err(map_sqlx_err)?;

            Ok(Message::stored(MessageId::from(id), message))
        })
    }

    fn list_after(
        &self,
        room_id: RoomId,
        after: Option<MessageId>,
        limit: u32,
    ) -> RepositoryFuture<Vec<Message>> {
        let pool = self.pool.clone();
        Box::pin(async move {
            let records = sqlx::query_as::<_, MessageRecord>(
                r#"
                SELECT m.id, m.room_id, m.author_id, a.nickname AS author_nickname,
                       m.text, m.created_at
                FROM messages m
                JOIN members a ON a.id = m.author_id
                WHERE m.room_id = $1
                  AND ($2::BIGINT IS NULL OR m.id > $2)
                ORDER BY m.created_at ASC, m.id ASC
                LIMIT $3
                "#,
            )
            .bind(Uuid::from(room_id))
            .bind(after.map(i64::from))
            .bind(i64::from(limit))
            .fetch_all(&pool)
            .await
            .map_err(map_sqlx_err)?;

            records.into_iter().map(Message::try_from).collect()
        })
    }
}
