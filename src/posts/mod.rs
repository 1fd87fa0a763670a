//! # Posts Module
//!
//! Blog post CRUD. Reads are public; creating requires a session, and editing
//! or deleting additionally requires owning the post (or being an admin).

pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod validators;

#[cfg(test)]
mod tests;

pub use routes::posts_routes;
