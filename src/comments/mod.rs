//! # Comments Module
//!
//! Comments belong to a post and are routed under `/posts/:post_id/comments`
//! (see `posts::routes`). Same gate rules as posts: reading is public,
//! writing needs a session, editing and deleting need ownership or admin.

pub mod handlers;
pub mod models;
pub mod services;
pub mod validators;
