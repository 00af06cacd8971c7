use std::sync::Arc;

use application::{Authenticator, ChatService, ProfileService, SessionService};

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub chat_service: Arc<ChatService>,
    pub profile_service: Arc<ProfileService>,
    pub authenticator: Arc<Authenticator>,
}

impl AppState {
    pub fn new(
        session_service: Arc<SessionService>,
        chat_service: Arc<ChatService>,
        profile_service: Arc<ProfileService>,
        authenticator: Arc<Authenticator>,
    ) -> Self {
        Self {
            session_service,
            chat_service,
            profile_service,
            authenticator,
        }
    }
}
