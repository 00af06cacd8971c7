use crate::member::Member;
use crate::value_objects::{MemberId, MessageId, MessageText, Nickname, RoomId, Timestamp};

/// The author fields carried alongside every message, so listings do not need
/// a lookup per row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct MessageAuthor {
    pub id: MemberId,
    pub nickname: Nickname,
}

impl From<&Member> for MessageAuthor {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            nickname: member.nickname.clone(),
        }
    }
}

/// A message waiting for storage to assign its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub room_id: RoomId,
    pub author: MessageAuthor,
    pub text: MessageText,
    pub created_at: Timestamp,
}

/// A stored message. Immutable once created; ordering is by `created_at` with
/// ties broken by `id`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Message {
    pub id: MessageId,
    pub room_id: RoomId,
    pub author: MessageAuthor,
    pub text: MessageText,
    pub created_at: Timestamp,
}

impl Message {
    pub fn stored(id: MessageId, draft: NewMessage) -> Self {
        Self {
            id,
            room_id: draft.room_id,
            author: draft.author,
            text: draft.text,
            created_at: draft.created_at,
        }
    }
}
