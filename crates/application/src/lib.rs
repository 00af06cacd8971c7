//! Application layer: use-case services around the domain model, plus the
//! adapter traits they depend on (password hashing, token generation, clock).

pub mod auth;
pub mod clock;
pub mod dto;
pub mod error;
pub mod password;
pub mod services;
pub mod token;

pub use auth::{AuthError, Authenticator, AuthenticatorDependencies, AUTH_SCHEME};
pub use clock::{Clock, SystemClock};
pub use dto::{AuthorDto, MemberDto, MessageDto, SessionDto};
pub use error::ApplicationError;
pub use password::{PasswordHasher, PasswordHasherError};
pub use services::{
    ChatService, ChatServiceDependencies, LoginRequest, PostMessageRequest, ProfileService,
    ProfileServiceDependencies, RegisterRequest, SessionService, SessionServiceDependencies,
    UpdateProfileRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use token::{RandomTokenGenerator, TokenGenerator};
