//! Store traits over the entity models
//!
//! Services depend on these traits rather than on `PgPool`, so their rules can
//! be tested against `mockall` mocks. The PostgreSQL implementations delegate
//! to the query functions in [`crate::models`].

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::task::{NewTask, Priority, Task, TaskStatus, TaskWithOwnerLogin};
use crate::models::user::{NewUser, User};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User persistence
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new active user and return it
    async fn create(&self, user: NewUser) -> Result<User, sqlx::Error>;

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, sqlx::Error>;

    async fn get_by_login(&self, login: &str) -> Result<Option<User>, sqlx::Error>;

    /// All users ordered by id
    async fn get_all(&self) -> Result<Vec<User>, sqlx::Error>;

    /// Set `active = false`; `false` if no row matched
    async fn block_by_id(&self, id: i64) -> Result<bool, sqlx::Error>;
}

/// Task persistence
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new `OPEN` task and return its id
    async fn create(&self, task: NewTask) -> Result<i64, sqlx::Error>;

    /// Overwrite mutable fields; `None` if no row matched
    async fn update(&self, task: Task) -> Result<Option<Task>, sqlx::Error>;

    async fn delete_by_id(&self, id: i64) -> Result<bool, sqlx::Error>;

    async fn delete_by_id_and_owner(&self, id: i64, user_id: i64) -> Result<bool, sqlx::Error>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Task>, sqlx::Error>;

    async fn get_by_user_login(&self, login: &str) -> Result<Vec<Task>, sqlx::Error>;

    async fn get_all(&self) -> Result<Vec<Task>, sqlx::Error>;

    async fn get_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, sqlx::Error>;

    async fn get_by_priority(&self, priority: Priority) -> Result<Vec<Task>, sqlx::Error>;

    async fn get_all_with_owner_login(&self) -> Result<Vec<TaskWithOwnerLogin>, sqlx::Error>;

    async fn get_with_owner_login_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Vec<TaskWithOwnerLogin>, sqlx::Error>;

    async fn get_with_owner_login_by_id(
        &self,
        id: i64,
    ) -> Result<Option<TaskWithOwnerLogin>, sqlx::Error>;
}

/// PostgreSQL-backed [`UserStore`]
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> Result<User, sqlx::Error> {
        User::create(&self.pool, &user).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>, sqlx::Error> {
        User::get_by_id(&self.pool, id).await
    }

    async fn get_by_login(&self, login: &str) -> Result<Option<User>, sqlx::Error> {
        User::get_by_login(&self.pool, login).await
    }

    async fn get_all(&self) -> Result<Vec<User>, sqlx::Error> {
        User::get_all(&self.pool).await
    }

    async fn block_by_id(&self, id: i64) -> Result<bool, sqlx::Error> {
        User::block_by_id(&self.pool, id).await
    }
}

/// PostgreSQL-backed [`TaskStore`]
#[derive(Debug, Clone)]
pub struct PgTaskStore {
    pool: PgPool,
}

impl PgTaskStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create(&self, task: NewTask) -> Result<i64, sqlx::Error> {
        Task::create(&self.pool, &task).await
    }

    async fn update(&self, task: Task) -> Result<Option<Task>, sqlx::Error> {
        Task::update(&self.pool, &task).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, sqlx::Error> {
        Task::delete_by_id(&self.pool, id).await
    }

    async fn delete_by_id_and_owner(&self, id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
        Task::delete_by_id_and_owner(&self.pool, id, user_id).await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Task>, sqlx::Error> {
        Task::get_by_id(&self.pool, id).await
    }

    async fn get_by_user_login(&self, login: &str) -> Result<Vec<Task>, sqlx::Error> {
        Task::get_by_user_login(&self.pool, login).await
    }

    async fn get_all(&self) -> Result<Vec<Task>, sqlx::Error> {
        Task::get_all(&self.pool).await
    }

    async fn get_by_status(&self, status: TaskStatus) -> Result<Vec<Task>, sqlx::Error> {
        Task::get_by_status(&self.pool, status).await
    }

    async fn get_by_priority(&self, priority: Priority) -> Result<Vec<Task>, sqlx::Error> {
        Task::get_by_priority(&self.pool, priority).await
    }

    async fn get_all_with_owner_login(&self) -> Result<Vec<TaskWithOwnerLogin>, sqlx::Error> {
        TaskWithOwnerLogin::get_all(&self.pool).await
    }

    async fn get_with_owner_login_by_user_id(
        &self,
        user_id: i64,
    ) -> Result<Vec<TaskWithOwnerLogin>, sqlx::Error> {
        TaskWithOwnerLogin::get_by_user_id(&self.pool, user_id).await
    }

    async fn get_with_owner_login_by_id(
        &self,
        id: i64,
    ) -> Result<Option<TaskWithOwnerLogin>, sqlx::Error> {
        TaskWithOwnerLogin::get_by_id(&self.pool, id).await
    }
}
