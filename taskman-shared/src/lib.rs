//! # Taskman Shared Library
//!
//! Domain, persistence and business rules for the Taskman task tracker.
//!
//! ## Module Organization
//!
//! - `models`: users and tasks with their SQL operations
//! - `store`: store traits over the models, with PostgreSQL implementations
//! - `service`: role-scoped task and user services
//! - `auth`: password hashing, session tokens and the caller [`auth::Principal`]
//! - `db`: connection pool and migrations
//! - `error`: the service error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod service;
pub mod store;

/// Current version of the Taskman shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
