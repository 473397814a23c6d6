/// Authentication primitives for Taskman
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: HS256 session tokens carrying a [`Principal`]
///
/// Authorization decisions are not made here; services receive the
/// [`Principal`] and apply role rules themselves.

pub mod password;
pub mod session;

use serde::{Deserialize, Serialize};

use crate::models::user::Role;

/// The authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: i64,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
