mod chat_service;
mod profile_service;
mod session_service;

pub use chat_service::{
    ChatService, ChatServiceDependencies, PostMessageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use profile_service::{ProfileService, ProfileServiceDependencies, UpdateProfileRequest};
pub use session_service::{
    LoginRequest, RegisterRequest, SessionService, SessionServiceDependencies,
};


#[cfg(test)]
mod profile_service_tests;
