//! # Auth Module
//!
//! This module handles all authentication-related functionality including:
//! - Local registration and email/password login
//! - Google OAuth login
//! - Session tokens carried in an httpOnly cookie
//! - The `AuthedUser` gate and resource ownership checks

pub mod extractors;
pub mod google;
pub mod handlers;
pub mod models;
pub mod ownership;
pub mod password;
pub mod routes;
pub mod session;
pub mod strategies;
pub mod token;
pub mod validators;


pub use extractors::AuthedUser;
pub use routes::auth_routes;
