use crate::errors::ValidationError;
use crate::value_objects::{RoomId, Timestamp};

/// A named container for an ordered message log. The service uses a single
/// well-known room, created lazily on first access.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ChatRoom {
    pub id: RoomId,
    pub name: String,
    pub created_at: Timestamp,
}

impl ChatRoom {
    pub fn new(
        id: RoomId,
        name: impl Into<String>,
        created_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::invalid_argument(
                "room_name",
                "cannot be empty",
            ));
        }
        Ok(Self {
            id,
            name,
            created_at,
        })
    }
}
