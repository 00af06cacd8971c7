//! Serialization views returned by the HTTP layer. Password hashes and token
//! internals never appear here.

use domain::{AuthToken, Member, MemberId, Message, MessageId, RoomId, Timestamp};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MemberDto {
    pub id: MemberId,
    pub nickname: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: Timestamp,
}

impl From<&Member> for MemberDto {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id,
            nickname: member.nickname.as_str().to_owned(),
            created_at: member.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorDto {
    pub id: MemberId,
    pub nickname: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageDto {
    pub id: MessageId,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: Timestamp,
    pub author: AuthorDto,
    pub room_id: RoomId,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            text: message.text.as_str().to_owned(),
            created_at: message.created_at,
            author: AuthorDto {
                id: message.author.id,
                nickname: message.author.nickname.as_str().to_owned(),
            },
            room_id: message.room_id,
        }
    }
}

/// Response of register and login: the bearer token plus the member it
/// belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct SessionDto {
    pub token: String,
    pub member: MemberDto,
}

impl SessionDto {
    pub fn new(token: AuthToken, member: &Member) -> Self {
        Self {
            token: token.key.into_string(),
            member: MemberDto::from(member),
        }
    }
}
