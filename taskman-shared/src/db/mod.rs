/// Database layer for Taskman
///
/// - `pool`: PostgreSQL connection pool with statement timeout and health check
/// - `migrations`: embedded migration runner
///
/// Entity queries live in [`crate::models`].

pub mod migrations;
pub mod pool;
