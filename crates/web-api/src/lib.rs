//! Web API layer.
//!
//! Axum routes delegating HTTP requests to the application-layer services.

mod auth;
mod error;
mod routes;
mod state;

pub use auth::CurrentSession;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
