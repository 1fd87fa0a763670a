//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /auth/register` - Local account registration
/// - `POST /auth/login` - Email/password login, sets the session cookie
/// - `GET /auth/google` - Start Google OAuth
/// - `GET /auth/google/callback` - Google OAuth callback
/// - `GET /auth/me` - Current user (requires session)
/// - `POST /auth/logout` - Clear the session cookie
pub fn auth_routes() -> Router {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/google", get(handlers::google_oauth_start))
        .route("/auth/google/callback", get(handlers::google_oauth_callback))
        .route("/auth/me", get(handlers::me_handler))
        .route("/auth/logout", post(handlers::logout_handler))
}
