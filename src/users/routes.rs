use super::handlers;
use axum::{
    routing::{get, put},
    Router,
};

/// Creates the users router
pub fn users_routes() -> Router {
    Router::new()
        .route("/users/me", put(handlers::update_me))
        .route("/users/:id", get(handlers::get_user))
}
