//! LNAC inference gateway.
//!
//! A thin axum service: static API key authentication in front of a
//! level-bucketed library lookup, plus unauthenticated health and debug
//! endpoints.

pub mod auth;
pub mod error;
pub mod inference;
pub mod logging;
pub mod server;
pub mod settings;

pub use auth::{AuthError, Authenticator, API_KEY_HEADER};
pub use error::ApiError;
pub use server::{build_router, start_server, AppState};
pub use settings::{LogFormat, Settings, SettingsOverrides};
