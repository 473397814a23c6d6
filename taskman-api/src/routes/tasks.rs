/// Task endpoints
///
/// All routes require a session. Which tasks a caller sees or may change is
/// decided by [`TaskService`](taskman_shared::service::TaskService).

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskman_shared::auth::Principal;
use taskman_shared::models::task::{Task, TaskWithOwnerLogin};
use taskman_shared::service::{CreateTask, UpdateTask};
use validator::Validate;

/// Create task request
///
/// `owner_login` defaults to the caller's own login.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    pub priority: i32,

    pub owner_login: Option<String>,
}

/// Update task request
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    /// `OPEN`, `IN_PROGRESS` or `DONE`
    pub status: String,

    pub priority: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    pub id: i64,
}

/// `GET /v1/tasks`: every task for administrators, own tasks otherwise
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<TaskWithOwnerLogin>>> {
    Ok(Json(state.tasks.get_tasks_for_user(&principal).await?))
}

/// `POST /v1/tasks`
pub async fn create_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<CreateTaskResponse>)> {
    req.validate()?;

    let owner_login = match req.owner_login {
        Some(login) => login,
        None => state
            .users
            .get_by_id(principal.user_id)
            .await?
            .map(|u| u.login)
            .unwrap_or_default(),
    };

    let id = state
        .tasks
        .create(
            &principal,
            CreateTask {
                priority: req.priority,
                title: req.title,
                description: req.description,
                owner_login,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(CreateTaskResponse { id })))
}

/// `GET /v1/tasks/:id`
pub async fn get_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskWithOwnerLogin>> {
    Ok(Json(state.tasks.get_by_id(&principal, id).await?))
}

/// `PUT /v1/tasks/:id`
pub async fn update_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    let task = state
        .tasks
        .update(
            &principal,
            UpdateTask {
                task_id: id,
                title: req.title,
                description: req.description,
                status: req.status,
                priority: req.priority,
            },
        )
        .await?;

    Ok(Json(task))
}

/// `DELETE /v1/tasks/:id`: 204 whether or not the task existed
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.tasks.delete_by_id(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /v1/tasks/user/:login`
pub async fn list_tasks_by_user_login(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(login): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.tasks.get_by_user_login(&principal, &login).await?))
}

/// `GET /v1/tasks/by-status/:status` (administrators)
pub async fn list_tasks_by_status(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(status): Path<String>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.tasks.get_by_status(&principal, &status).await?))
}

/// `GET /v1/tasks/by-priority/:priority` (administrators)
pub async fn list_tasks_by_priority(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(priority): Path<i32>,
) -> ApiResult<Json<Vec<Task>>> {
    Ok(Json(state.tasks.get_by_priority(&principal, priority).await?))
}
