use futures::future::BoxFuture;

use crate::auth_token::AuthToken;
use crate::chat_room::ChatRoom;
use crate::errors::RepositoryError;
use crate::member::Member;
use crate::message::{Message, NewMessage};
use crate::value_objects::{MemberId, MessageId, Nickname, RoomId, TokenKey};

pub type RepositoryResult<T> = Result<T, RepositoryError>;
pub type RepositoryFuture<T> = BoxFuture<'static, RepositoryResult<T>>;

/// Persistence for members. `create` and `update` must reject a duplicate
/// nickname with [`RepositoryError::Conflict`]; the unique constraint in the
/// store is the final word on nickname uniqueness.
pub trait MemberRepository: Send + Sync {
    fn create(&self, member: Member) -> RepositoryFuture<Member>;
    fn update(&self, member: Member) -> RepositoryFuture<Member>;
    fn find_by_id(&self, id: MemberId) -> RepositoryFuture<Option<Member>>;
    fn find_by_nickname(&self, nickname: Nickname) -> RepositoryFuture<Option<Member>>;
}

/// Persistence for issued tokens, keyed by the opaque key itself.
pub trait AuthTokenRepository: Send + Sync {
    fn create(&self, token: AuthToken) -> RepositoryFuture<AuthToken>;
    fn find_by_key(&self, key: TokenKey) -> RepositoryFuture<Option<AuthToken>>;
    /// The member's most recently created token, if any. Login reuses it
    /// instead of minting another.
    fn find_latest_for_member(&self, member_id: MemberId) -> RepositoryFuture<Option<AuthToken>>;
    /// Deleting an absent key is a no-op, so logout stays idempotent.
    fn delete(&self, key: TokenKey) -> RepositoryFuture<()>;
}

/// Persistence for rooms. Creation races on the unique name must be absorbed:
/// whichever row wins is returned.
pub trait ChatRoomRepository: Send + Sync {
    fn get_or_create(&self, room: ChatRoom) -> RepositoryFuture<ChatRoom>;
    fn find_by_name(&self, name: String) -> RepositoryFuture<Option<ChatRoom>>;
}

/// Persistence for messages. Storage assigns ids in insert order.
pub trait MessageRepository: Send + Sync {
    fn create(&self, message: NewMessage) -> RepositoryFuture<Message>;
    /// Messages in the room with id strictly greater than `after`, ascending
    /// by creation time (ties by id), at most `limit` rows.
    fn list_after(
        &self,
        room_id: RoomId,
        after: Option<MessageId>,
        limit: u32,
    ) -> RepositoryFuture<Vec<Message>>;
}
