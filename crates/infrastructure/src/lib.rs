//! Infrastructure adapters: PostgreSQL repositories and the bcrypt password
//! hasher, implementing the interfaces defined by the domain and application
//! layers.

pub mod password;
pub mod repository;

pub use password::BcryptPasswordHasher;
pub use repository::{
    create_pg_pool, PgAuthTokenRepository, PgChatRoomRepository, PgMemberRepository,
    PgMessageRepository,
};
