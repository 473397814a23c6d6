//! User service

use std::sync::Arc;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::Principal;
use crate::error::{ServiceError, ServiceResult};
use crate::models::user::{NewUser, Role, User};
use crate::store::UserStore;

use super::{require_admin, require_non_empty};

/// Longest accepted login, matching the `users.login` column
pub const MAX_LOGIN_LEN: usize = 255;

/// Input for [`UserService::create`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUser {
    pub login: String,
    /// Plaintext; hashed before it reaches the store
    pub password: String,
    pub role: Role,
}

/// Account management and authentication
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Creates an account (administrators only)
    ///
    /// # Errors
    ///
    /// - `Forbidden` if the caller is not an administrator
    /// - `Validation` for an empty or overlong login or an empty password
    /// - `AlreadyExists` if the login is taken, including by a concurrent insert
    /// - `Infrastructure` if the lookup or insert fails for any other reason
    pub async fn create(&self, principal: &Principal, input: CreateUser) -> ServiceResult<User> {
        require_admin(principal, "creating users")?;
        self.create_unchecked(input).await
    }

    async fn create_unchecked(&self, input: CreateUser) -> ServiceResult<User> {
        require_non_empty("login", &input.login)?;
        require_non_empty("password", &input.password)?;
        if input.login.chars().count() > MAX_LOGIN_LEN {
            return Err(ServiceError::Validation(format!(
                "login must be at most {} characters",
                MAX_LOGIN_LEN
            )));
        }

        if self.users.get_by_login(&input.login).await?.is_some() {
            return Err(ServiceError::AlreadyExists(format!(
                "login {} is already taken",
                input.login
            )));
        }

        let password_hash = hash_password(&input.password).map_err(|e| {
            tracing::error!(error = %e, "password hashing failed");
            ServiceError::Infrastructure(e.to_string())
        })?;

        let user = self
            .users
            .create(NewUser {
                login: input.login,
                password_hash,
                role: input.role,
            })
            .await?;

        tracing::info!(user_id = user.id, login = %user.login, role = %user.role, "user created");

        Ok(user)
    }

    pub async fn get_by_login(&self, login: &str) -> ServiceResult<Option<User>> {
        Ok(self.users.get_by_login(login).await?)
    }

    pub async fn get_by_id(&self, id: i64) -> ServiceResult<Option<User>> {
        Ok(self.users.get_by_id(id).await?)
    }

    /// Lists every account (administrators only)
    pub async fn get_all(&self, principal: &Principal) -> ServiceResult<Vec<User>> {
        require_admin(principal, "listing users")?;
        Ok(self.users.get_all().await?)
    }

    /// Deactivates an account (administrators only)
    ///
    /// `NotFound` when no account has this id.
    pub async fn block_by_id(&self, principal: &Principal, user_id: i64) -> ServiceResult<()> {
        require_admin(principal, "blocking users")?;

        if !self.users.block_by_id(user_id).await? {
            return Err(ServiceError::NotFound(format!("user {}", user_id)));
        }

        tracing::info!(user_id, blocked_by = principal.user_id, "user blocked");

        Ok(())
    }

    /// Checks a login/password pair
    ///
    /// Unknown login and wrong password both yield `InvalidCredentials`.
    /// Blocked accounts are not refused here.
    pub async fn authenticate(&self, login: &str, password: &str) -> ServiceResult<User> {
        let Some(user) = self.users.get_by_login(login).await? else {
            tracing::debug!(login, "login attempt for unknown user");
            return Err(ServiceError::InvalidCredentials);
        };

        match verify_password(password, &user.password) {
            Ok(true) => Ok(user),
            Ok(false) => Err(ServiceError::InvalidCredentials),
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "stored password hash is unusable");
                Err(ServiceError::InvalidCredentials)
            }
        }
    }

    /// Makes sure an administrator with `login` exists
    ///
    /// Returns `true` if the account was created, `false` if the login was already present.
    pub async fn ensure_admin(&self, login: &str, password: &str) -> ServiceResult<bool> {
        let input = CreateUser {
            login: login.to_string(),
            password: password.to_string(),
            role: Role::Admin,
        };

        match self.create_unchecked(input).await {
            Ok(_) => Ok(true),
            Err(ServiceError::AlreadyExists(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
