/// Database models for Taskman
///
/// This module contains the persisted entities and their SQL operations.
/// Every query is parameterized; ids are drawn from per-entity sequences
/// (`users_sequence`, `tasks_sequence`) before the row is inserted.
///
/// # Models
///
/// - `user`: User accounts, roles and the active/blocked flag
/// - `task`: Tasks owned by users, plus the owner-login projection
///
/// # Example
///
/// ```no_run
/// use taskman_shared::models::user::{NewUser, Role, User};
/// use taskman_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = NewUser {
///     login: "alice".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     role: Role::User,
/// };
///
/// let user = User::create(&pool, &new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;

/// Error returned when a stored or submitted value is outside an enumerated domain
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct UnknownVariant {
    /// Name of the enumeration (e.g. "role")
    pub kind: &'static str,

    /// The rejected value
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}
