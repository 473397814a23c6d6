/// Task model and database operations
///
/// Each task is owned by exactly one user (`user_id`). Ownership is fixed at
/// creation: `update` rewrites title, description, priority and status only.
///
/// # Status
///
/// ```text
/// OPEN → IN_PROGRESS → DONE
/// ```
///
/// The order is conventional, not enforced: any status may follow any other.
///
/// # Schema
///
/// ```sql
/// CREATE SEQUENCE tasks_sequence;
///
/// CREATE TABLE tasks (
///     id BIGINT PRIMARY KEY,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL,
///     priority INTEGER NOT NULL CHECK (priority BETWEEN 1 AND 4),
///     status VARCHAR(16) NOT NULL CHECK (status IN ('OPEN', 'IN_PROGRESS', 'DONE')),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     user_id BIGINT NOT NULL REFERENCES users(id)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskman_shared::models::task::{NewTask, Priority, Task};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let id = Task::create(&pool, &NewTask {
///     title: "Fix bug".to_string(),
///     description: "Login form rejects valid passwords".to_string(),
///     priority: Priority::Blocker,
///     user_id: 1,
/// }).await?;
///
/// let task = Task::get_by_id(&pool, id).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;

use super::UnknownVariant;

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Newly created, not started
    Open,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Converts status to its stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Open => "OPEN",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(TaskStatus::Open),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            other => Err(UnknownVariant::new("status", other)),
        }
    }
}

impl TryFrom<String> for TaskStatus {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Task priority, stored as an integer from 1 (most urgent) to 4
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Priority {
    Blocker = 1,
    High = 2,
    Medium = 3,
    Low = 4,
}

impl Priority {
    /// Stored integer value
    pub fn value(&self) -> i32 {
        *self as i32
    }
}

impl TryFrom<i32> for Priority {
    type Error = UnknownVariant;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Priority::Blocker),
            2 => Ok(Priority::High),
            3 => Ok(Priority::Medium),
            4 => Ok(Priority::Low),
            other => Err(UnknownVariant::new("priority", other.to_string())),
        }
    }
}

impl From<Priority> for i32 {
    fn from(priority: Priority) -> Self {
        priority.value()
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Sequence-allocated id
    pub id: i64,

    pub title: String,

    pub description: String,

    #[sqlx(try_from = "i32")]
    pub priority: Priority,

    #[sqlx(try_from = "String")]
    pub status: TaskStatus,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,

    /// Owner
    pub user_id: i64,
}

/// Task joined with its owner's login, for read views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskWithOwnerLogin {
    pub id: i64,

    pub title: String,

    pub description: String,

    #[sqlx(try_from = "i32")]
    pub priority: Priority,

    #[sqlx(try_from = "String")]
    pub status: TaskStatus,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    pub user_id: i64,

    /// Login of the owning user
    pub owner_login: String,
}

/// Input for creating a new task
///
/// New tasks always start in `OPEN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub user_id: i64,
}

impl Task {
    /// Allocates the next task id from `tasks_sequence`
    pub async fn next_id(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT nextval('tasks_sequence')")
            .fetch_one(pool)
            .await
    }

    /// Creates a new task in `OPEN` status and returns its id
    ///
    /// `created_at` and `updated_at` receive the same timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner does not exist (foreign key violation)
    /// or the database operation fails
    pub async fn create(pool: &PgPool, data: &NewTask) -> Result<i64, sqlx::Error> {
        let id = Self::next_id(pool).await?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, description, priority, status, created_at, updated_at, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $6, $7)
            "#,
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.priority.value())
        .bind(TaskStatus::Open.as_str())
        .bind(now)
        .bind(data.user_id)
        .execute(pool)
        .await?;

        Ok(id)
    }

    /// Rewrites the mutable fields of a task and refreshes `updated_at`
    ///
    /// `user_id` is never touched. Returns `None` if no row has this id.
    pub async fn update(pool: &PgPool, task: &Task) -> Result<Option<Self>, sqlx::Error> {
        let updated = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $2,
                description = $3,
                priority = $4,
                status = $5,
                updated_at = $6
            WHERE id = $1
            RETURNING id, title, description, priority, status, created_at, updated_at, user_id
            "#,
        )
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority.value())
        .bind(task.status.as_str())
        .bind(Utc::now())
        .fetch_optional(pool)
        .await?;

        Ok(updated)
    }

    /// Deletes a task
    ///
    /// Deleting a missing id is not an error; the result tells whether a row went away.
    pub async fn delete_by_id(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes a task only if it belongs to `user_id`
    pub async fn delete_by_id_and_owner(
        pool: &PgPool,
        id: i64,
        user_id: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Finds a task by id
    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, status, created_at, updated_at, user_id
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists the tasks owned by the user with this login
    pub async fn get_by_user_login(pool: &PgPool, login: &str) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT t.id, t.title, t.description, t.priority, t.status,
                   t.created_at, t.updated_at, t.user_id
            FROM tasks t
            JOIN users u ON u.id = t.user_id
            WHERE u.login = $1
            ORDER BY t.id
            "#,
        )
        .bind(login)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists all tasks ordered by id
    pub async fn get_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, status, created_at, updated_at, user_id
            FROM tasks
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks in the given status ordered by id
    pub async fn get_by_status(pool: &PgPool, status: TaskStatus) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, status, created_at, updated_at, user_id
            FROM tasks
            WHERE status = $1
            ORDER BY id
            "#,
        )
        .bind(status.as_str())
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists tasks with the given priority ordered by id
    pub async fn get_by_priority(pool: &PgPool, priority: Priority) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, title, description, priority, status, created_at, updated_at, user_id
            FROM tasks
            WHERE priority = $1
            ORDER BY id
            "#,
        )
        .bind(priority.value())
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Counts all tasks
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

impl TaskWithOwnerLogin {
    /// Lists every task with its owner's login, ordered by id
    pub async fn get_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithOwnerLogin>(
            r#"
            SELECT t.id, t.title, t.description, t.priority, t.status,
                   t.created_at, t.updated_at, t.user_id, u.login AS owner_login
            FROM tasks t
            JOIN users u ON u.id = t.user_id
            ORDER BY t.id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Lists the tasks owned by `user_id`, ordered by id
    pub async fn get_by_user_id(pool: &PgPool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, TaskWithOwnerLogin>(
            r#"
            SELECT t.id, t.title, t.description, t.priority, t.status,
                   t.created_at, t.updated_at, t.user_id, u.login AS owner_login
            FROM tasks t
            JOIN users u ON u.id = t.user_id
            WHERE t.user_id = $1
            ORDER BY t.id
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// Finds one task with its owner's login
    pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, TaskWithOwnerLogin>(
            r#"
            SELECT t.id, t.title, t.description, t.priority, t.status,
                   t.created_at, t.updated_at, t.user_id, u.login AS owner_login
            FROM tasks t
            JOIN users u ON u.id = t.user_id
            WHERE t.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }
}
