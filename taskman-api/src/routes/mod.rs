/// API route handlers, organized by resource
///
/// - `health`: health check
/// - `auth`: login, logout, current account
/// - `tasks`: task CRUD and listings
/// - `users`: account management

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
