/// Session cookie middleware
///
/// Reads the `taskman_session` cookie, validates it, and inserts the caller's
/// [`Principal`] into request extensions. Handlers behind this layer extract
/// it with `Extension<Principal>`.
///
/// Requests without a valid session are rejected with 401 before reaching a handler.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Duration;
use taskman_shared::auth::session::{
    create_session_token, decode_session, SessionClaims, SessionError,
};
use taskman_shared::auth::Principal;

use crate::{app::AppState, config::SessionConfig, error::ApiError};

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "taskman_session";

/// Builds a signed session cookie for `principal`
pub fn session_cookie(principal: Principal, config: &SessionConfig) -> Result<Cookie<'static>, ApiError> {
    let ttl = Duration::try_hours(config.ttl_hours).ok_or_else(|| {
        SessionError::Create(format!("session ttl of {} hours is out of range", config.ttl_hours))
    })?;
    let claims = SessionClaims::new(principal, ttl);
    let token = create_session_token(&claims, &config.secret)?;

    Ok(Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.cookie_secure)
        .build())
}

/// Cookie that clears the session on the client
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

/// Rejects requests without a valid session; otherwise injects the [`Principal`]
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let jar = CookieJar::from_headers(req.headers());

    let token = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("Missing session".to_string()))?;

    let principal = decode_session(&token, state.session_secret())?;

    tracing::debug!(user_id = principal.user_id, role = %principal.role, "session accepted");

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
