use crate::value_objects::{MemberId, Nickname, PasswordHash, Timestamp};

/// A registered user, identified by a unique nickname. Members are never
/// hard-deleted.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Member {
    pub id: MemberId,
    pub nickname: Nickname,
    #[serde(skip_serializing)] // never echoed to clients
    pub password: PasswordHash,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Member {
    pub fn register(
        id: MemberId,
        nickname: Nickname,
        password: PasswordHash,
        now: Timestamp,
    ) -> Self {
        Self {
            id,
            nickname,
            password,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rename(&mut self, nickname: Nickname, now: Timestamp) {
        self.nickname = nickname;
        self.updated_at = now;
    }

    pub fn set_password(&mut self, password: PasswordHash, now: Timestamp) {
        self.password = password;
        self.updated_at = now;
    }
}
