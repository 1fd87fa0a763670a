use super::handlers;
use crate::comments::handlers as comment_handlers;
use axum::{
    routing::{get, put},
    Router,
};

/// Creates the posts router, including comments nested under each post
pub fn posts_routes() -> Router {
    Router::new()
        .route("/posts", get(handlers::list_posts).post(handlers::create_post))
        .route(
            "/posts/:post_id",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route(
            "/posts/:post_id/comments",
            get(comment_handlers::list_comments).post(comment_handlers::create_comment),
        )
        .route(
            "/posts/:post_id/comments/:comment_id",
            put(comment_handlers::update_comment).delete(comment_handlers::delete_comment),
        )
}
