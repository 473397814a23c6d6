/// Access-scoped services
///
/// Services sit between request handlers and the stores. They validate
/// input before any store access, apply role-based visibility using the
/// caller's [`Principal`](crate::auth::Principal), and translate store
/// failures into [`ServiceError`](crate::error::ServiceError).
///
/// - [`task::TaskService`]: task CRUD scoped by owner and role
/// - [`user::UserService`]: account management and authentication

pub mod task;
pub mod user;

pub use task::{CreateTask, TaskService, UpdateTask};
pub use user::{CreateUser, UserService};

use crate::auth::Principal;
use crate::error::{ServiceError, ServiceResult};

/// Fails with `Forbidden` unless the caller is an administrator
pub(crate) fn require_admin(principal: &Principal, action: &str) -> ServiceResult<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        tracing::warn!(user_id = principal.user_id, action, "non-admin attempted admin action");
        Err(ServiceError::Forbidden(format!("{} requires administrator role", action)))
    }
}

/// Fails with `Validation` if `value` is empty or whitespace
pub(crate) fn require_non_empty(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        Err(ServiceError::Validation(format!("{} must not be empty", field)))
    } else {
        Ok(())
    }
}
