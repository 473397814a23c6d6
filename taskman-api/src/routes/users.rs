/// User management endpoints (administrators only)

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use taskman_shared::auth::Principal;
use taskman_shared::models::user::{Role, User};
use taskman_shared::service::CreateUser;

/// Create user request
///
/// Field checks run in the service, after the role check.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub login: String,

    pub password: String,

    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::User
}

/// `GET /v1/users`
pub async fn list_users(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.users.get_all(&principal).await?))
}

/// `POST /v1/users`
///
/// # Errors
///
/// - `403 Forbidden`: caller is not an administrator
/// - `400 Bad Request`: empty or overlong login, empty password
/// - `409 Conflict`: login already taken
pub async fn create_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = state
        .users
        .create(
            &principal,
            CreateUser {
                login: req.login,
                password: req.password,
                role: req.role,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// `PUT /v1/users/:id/block`
pub async fn block_user(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.users.block_by_id(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
