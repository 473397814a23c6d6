/// Authentication endpoints
///
/// - `POST /v1/auth/login`: check credentials, set the session cookie
/// - `POST /v1/auth/logout`: clear the session cookie
/// - `GET  /v1/auth/me`: the account behind the current session

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::{removal_cookie, session_cookie},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use taskman_shared::auth::Principal;
use taskman_shared::models::user::{Role, User};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 255, message = "Login is required"))]
    pub login: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response; the session itself travels in the cookie
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user_id: i64,
    pub login: String,
    pub role: Role,
}

/// Authenticates and starts a session
///
/// # Errors
///
/// - `400 Bad Request`: empty login or password
/// - `401 Unauthorized`: unknown login or wrong password
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> ApiResult<(CookieJar, Json<LoginResponse>)> {
    req.validate()?;

    let user = state.users.authenticate(&req.login, &req.password).await?;

    let principal = Principal {
        user_id: user.id,
        role: user.role,
    };
    let cookie = session_cookie(principal, &state.config.session)?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok((
        jar.add(cookie),
        Json(LoginResponse {
            user_id: user.id,
            login: user.login,
            role: user.role,
        }),
    ))
}

/// Ends the session
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (jar.remove(removal_cookie()), StatusCode::NO_CONTENT)
}

/// Returns the current account
pub async fn me(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<User>> {
    state
        .users
        .get_by_id(principal.user_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::Unauthorized("Session user no longer exists".to_string()))
}
