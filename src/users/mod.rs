//! # Users Module
//!
//! Public profiles and self-service profile updates, plus the credential store
//! the auth module authenticates against.

pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;
pub mod validators;


pub use routes::users_routes;
