use std::sync::Arc;

use domain::{
    ChatRoom, ChatRoomRepository, Message, MessageAuthor, MessageId, MessageRepository,
    MessageText, NewMessage, RoomId,
};
use uuid::Uuid;

use crate::{clock::Clock, error::ApplicationError};

pub const DEFAULT_PAGE_SIZE: i64 = 50;
pub const MAX_PAGE_SIZE: i64 = 200;

#[derive(Debug, Clone)]
pub struct PostMessageRequest {
    pub author: MessageAuthor,
    pub text: String,
}

pub struct ChatServiceDependencies {
    pub room_repository: Arc<dyn ChatRoomRepository>,
    pub message_repository: Arc<dyn MessageRepository>,
    pub clock: Arc<dyn Clock>,
}

/// Single-room chat: an append-only message log with cursor pagination. The
/// room name comes from configuration; the row is resolved per call through
/// an idempotent get-or-create, never cached in the process.
pub struct ChatService {
    deps: ChatServiceDependencies,
    room_name: String,
}

impl ChatService {
    pub fn new(deps: ChatServiceDependencies, room_name: impl Into<String>) -> Self {
        Self {
            deps,
            room_name: room_name.into(),
        }
    }

    pub async fn list_messages(
        &self,
        after: Option<MessageId>,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, ApplicationError> {
        let room = self.ensure_room().await?;
        let limit = effective_limit(limit);
        let messages = self
            .deps
            .message_repository
            .list_after(room.id, after, limit)
            .await?;
        Ok(messages)
    }

    pub async fn post_message(
        &self,
        request: PostMessageRequest,
    ) -> Result<Message, ApplicationError> {
        let text = MessageText::parse(request.text)?;
        let room = self.ensure_room().await?;
        let draft = NewMessage {
            room_id: room.id,
            author: request.author,
            text,
            created_at: self.deps.clock.now(),
        };
        let stored = self.deps.message_repository.create(draft).await?;
        Ok(stored)
    }

    async fn ensure_room(&self) -> Result<ChatRoom, ApplicationError> {
        let candidate = ChatRoom::new(
            RoomId::from(Uuid::new_v4()),
            self.room_name.clone(),
            self.deps.clock.now(),
        )?;
        Ok(self.deps.room_repository.get_or_create(candidate).await?)
    }
}

/// Missing or non-positive limits fall back to the default; oversized ones
/// clamp to the maximum.
fn effective_limit(limit: Option<i64>) -> u32 {
    match limit {
        Some(n) if n > 0 => n.min(MAX_PAGE_SIZE) as u32,
        _ => DEFAULT_PAGE_SIZE as u32,
    }
}
