//! Core domain model for the member-registration and chat service.
//!
//! Entities, validated value objects, error taxonomy, and the repository
//! interfaces the application layer depends on.

pub mod auth_token;
pub mod chat_room;
pub mod errors;
pub mod member;
pub mod message;
pub mod repository;
pub mod value_objects;

pub use auth_token::AuthToken;
pub use chat_room::ChatRoom;
pub use errors::{RepositoryError, ValidationError};
pub use member::Member;
pub use message::{Message, MessageAuthor, NewMessage};
pub use repository::{
    AuthTokenRepository, ChatRoomRepository, MemberRepository, MessageRepository,
    RepositoryFuture, RepositoryResult,
};
pub use value_objects::{
    MemberId, MessageId, MessageText, Nickname, PasswordHash, RoomId, Timestamp, TokenKey,
    NICKNAME_MAX_LEN, TOKEN_KEY_LEN,
};
