//! Todo Service - A small todo REST API
//!
//! CRUD over todo items stored in PostgreSQL, with filtered lists cached in
//! Redis and invalidated on every write.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use api::{create_router, AppState};
pub use config::Config;
