//! HTTP boundary for DropKey.
//!
//! Maps requests onto the identity and paste components, mints bearer
//! credentials after a successful challenge–response, and enforces that a
//! paste write is made with the key the credential was issued for.

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod credential;
pub mod error;
pub mod handlers;
pub mod state;

pub use credential::{Claims, CredentialError, CredentialIssuer};
pub use error::ApiError;
pub use state::AppState;

/// Build the service router.
pub fn router(state: AppState) -> Router {
    use handlers::{pastes, users};

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/api/users",
            post(users::register).get(users::get_by_public_key),
        )
        .route("/api/users/auth", post(users::authenticate))
        .route("/api/users/:id", get(users::get_by_id))
        .route(
            "/api/pastes",
            post(pastes::create).get(pastes::get_by_public_key),
        )
        .route("/api/pastes/:id", get(pastes::get_by_id).put(pastes::update))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
