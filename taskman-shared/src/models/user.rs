/// User model and database operations
///
/// Users are created by administrators, never physically deleted, and
/// deactivated by flipping `active` to false.
///
/// # Schema
///
/// ```sql
/// CREATE SEQUENCE users_sequence;
///
/// CREATE TABLE users (
///     id BIGINT PRIMARY KEY,
///     login VARCHAR(255) NOT NULL UNIQUE,
///     password VARCHAR(255) NOT NULL,
///     role VARCHAR(16) NOT NULL CHECK (role IN ('ADMIN', 'USER')),
///     active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskman_shared::models::user::User;
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// if let Some(user) = User::get_by_login(&pool, "alice").await? {
///     User::block_by_id(&pool, user.id).await?;
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

use super::UnknownVariant;

/// Unique constraint guarding `users.login`
pub const LOGIN_UNIQUE_CONSTRAINT: &str = "users_login_key";

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Sees every task, manages user accounts
    Admin,

    /// Sees and manages only their own tasks
    User,
}

impl Role {
    /// Converts role to its stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }

    /// Checks if this role has administrator privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "USER" => Ok(Role::User),
            other => Err(UnknownVariant::new("role", other)),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// User model representing an account
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Sequence-allocated id
    pub id: i64,

    /// Unique login
    pub login: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password: String,

    /// Account role
    #[sqlx(try_from = "String")]
    pub role: Role,

    /// False once the account has been blocked
    pub active: bool,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique login
    pub login: String,

    /// Argon2id hash (never the plaintext password)
    pub password_hash: String,

    /// Account role
    pub role: Role,
}

impl User {
    /// Allocates the next user id from `users_sequence`
    pub async fn next_id(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT nextval('users_sequence')")
            .fetch_one(pool)
            .await
    }

    /// Creates a new active user
    ///
    /// The id is allocated from the sequence before the insert runs.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The login already exists (`users_login_key` violation)
    /// - The database connection fails
    pub async fn create(pool: &PgPool, data: &NewUser) -> Result<Self, sqlx::Error> {
        let id = Self::next_id(pool).await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, login, password, role, active, created_at)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            RETURNING id, login, password, role, active, created_at
            "#,
        )
        .bind(id)
        .bind(&data.login)
        .bind(&data.password_hash)
        .bind(data.role.as_str())
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by id
    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, login, password, role, active, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by login
    ///
    /// `Ok(None)` means the login is free; any other failure is an `Err`.
    pub async fn get_by_login(pool: &PgPool, login: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, login, password, role, active, created_at
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Lists all users ordered by id
    pub async fn get_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, login, password, role, active, created_at
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }

    /// Marks a user as blocked
    ///
    /// Returns `true` only if a row was actually updated.
    pub async fn block_by_id(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET active = FALSE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts all users
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}
