//! Task service
//!
//! Visibility rules:
//!
//! | Operation | ADMIN | USER |
//! |---|---|---|
//! | create | for any owner | only for self |
//! | update / get_by_id | any task | own tasks only |
//! | delete_by_id | any task | own tasks only, silent otherwise |
//! | get_by_user_login | any login | own login only |
//! | get_tasks_for_user | every task | own tasks |
//! | get_by_status / get_by_priority | allowed | forbidden |

use std::sync::Arc;

use crate::auth::Principal;
use crate::error::{ServiceError, ServiceResult};
use crate::models::task::{NewTask, Priority, Task, TaskStatus, TaskWithOwnerLogin};
use crate::store::{TaskStore, UserStore};

use super::{require_admin, require_non_empty};

/// Input for [`TaskService::create`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTask {
    pub priority: i32,
    pub title: String,
    pub description: String,
    pub owner_login: String,
}

/// Input for [`TaskService::update`]
///
/// `status` is the raw submitted value; it is checked against the known set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTask {
    pub task_id: i64,
    pub title: String,
    pub description: String,
    pub status: String,
    pub priority: i32,
}

/// Role-scoped task operations
#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
    users: Arc<dyn UserStore>,
}

fn parse_priority(priority: i32) -> ServiceResult<Priority> {
    Priority::try_from(priority).map_err(|_| {
        ServiceError::Validation(format!("priority must be between 1 and 4, got {}", priority))
    })
}

fn parse_status(status: &str) -> ServiceResult<TaskStatus> {
    status
        .parse()
        .map_err(|_| ServiceError::Validation(format!("unknown status: {}", status)))
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskStore>, users: Arc<dyn UserStore>) -> Self {
        Self { tasks, users }
    }

    /// Creates a task in `OPEN` status for `owner_login` and returns its id
    pub async fn create(&self, principal: &Principal, input: CreateTask) -> ServiceResult<i64> {
        require_non_empty("title", &input.title)?;
        require_non_empty("description", &input.description)?;
        require_non_empty("owner login", &input.owner_login)?;
        let priority = parse_priority(input.priority)?;

        if !principal.is_admin() {
            let own = self.users.get_by_id(principal.user_id).await?;
            if own.map(|u| u.login).as_deref() != Some(input.owner_login.as_str()) {
                return Err(ServiceError::Forbidden(
                    "users may only create tasks for themselves".to_string(),
                ));
            }
        }

        let owner = self
            .users
            .get_by_login(&input.owner_login)
            .await?
            .ok_or_else(|| {
                ServiceError::Validation(format!("unknown owner login: {}", input.owner_login))
            })?;

        let id = self
            .tasks
            .create(NewTask {
                title: input.title,
                description: input.description,
                priority,
                user_id: owner.id,
            })
            .await?;

        tracing::info!(task_id = id, owner_id = owner.id, created_by = principal.user_id, "task created");

        Ok(id)
    }

    /// Overwrites title, description, status and priority of an existing task
    ///
    /// The read and the write are separate round trips; a concurrent update
    /// between them is overwritten.
    pub async fn update(&self, principal: &Principal, input: UpdateTask) -> ServiceResult<Task> {
        require_non_empty("title", &input.title)?;
        require_non_empty("description", &input.description)?;
        let status = parse_status(&input.status)?;
        let priority = parse_priority(input.priority)?;

        let mut task = self
            .tasks
            .get_by_id(input.task_id)
            .await?
            .filter(|t| principal.is_admin() || t.user_id == principal.user_id)
            .ok_or_else(|| ServiceError::Validation(format!("task {} does not exist", input.task_id)))?;

        task.title = input.title;
        task.description = input.description;
        task.status = status;
        task.priority = priority;

        let updated = self
            .tasks
            .update(task)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("task {}", input.task_id)))?;

        tracing::info!(task_id = updated.id, status = %updated.status, "task updated");

        Ok(updated)
    }

    /// Deletes a task; deleting a missing or foreign task is a no-op
    pub async fn delete_by_id(&self, principal: &Principal, task_id: i64) -> ServiceResult<()> {
        let deleted = if principal.is_admin() {
            self.tasks.delete_by_id(task_id).await?
        } else {
            self.tasks
                .delete_by_id_and_owner(task_id, principal.user_id)
                .await?
        };

        tracing::debug!(task_id, deleted, "task delete");

        Ok(())
    }

    /// Fetches one task with its owner's login
    pub async fn get_by_id(
        &self,
        principal: &Principal,
        task_id: i64,
    ) -> ServiceResult<TaskWithOwnerLogin> {
        self.tasks
            .get_with_owner_login_by_id(task_id)
            .await?
            .filter(|t| principal.is_admin() || t.user_id == principal.user_id)
            .ok_or_else(|| ServiceError::NotFound(format!("task {}", task_id)))
    }

    /// Tasks owned by `login`
    pub async fn get_by_user_login(
        &self,
        principal: &Principal,
        login: &str,
    ) -> ServiceResult<Vec<Task>> {
        if !principal.is_admin() {
            let own = self.users.get_by_id(principal.user_id).await?;
            if own.map(|u| u.login) != Some(login.to_string()) {
                return Err(ServiceError::Forbidden(
                    "users may only list their own tasks".to_string(),
                ));
            }
        }

        Ok(self.tasks.get_by_user_login(login).await?)
    }

    /// Every task for an administrator, only owned tasks otherwise
    pub async fn get_tasks_for_user(
        &self,
        principal: &Principal,
    ) -> ServiceResult<Vec<TaskWithOwnerLogin>> {
        let tasks = if principal.is_admin() {
            self.tasks.get_all_with_owner_login().await?
        } else {
            self.tasks
                .get_with_owner_login_by_user_id(principal.user_id)
                .await?
        };

        Ok(tasks)
    }

    /// Administrator listing by status
    pub async fn get_by_status(&self, principal: &Principal, status: &str) -> ServiceResult<Vec<Task>> {
        let status = parse_status(status)?;
        require_admin(principal, "listing tasks by status")?;

        Ok(self.tasks.get_by_status(status).await?)
    }

    /// Administrator listing by priority
    pub async fn get_by_priority(
        &self,
        principal: &Principal,
        priority: i32,
    ) -> ServiceResult<Vec<Task>> {
        let priority = parse_priority(priority)?;
        require_admin(principal, "listing tasks by priority")?;

        Ok(self.tasks.get_by_priority(priority).await?)
    }
}
