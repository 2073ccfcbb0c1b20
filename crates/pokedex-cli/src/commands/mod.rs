//! Command implementations.

pub mod auth;
pub mod health;
pub mod pokemon;
