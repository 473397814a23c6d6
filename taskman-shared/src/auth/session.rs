/// Session token encoding and validation
///
/// The session cookie carries a compact HS256 JWT whose payload is only the
/// caller's id and role. It is decoded once, at the HTTP boundary, into a
/// [`Principal`]; nothing downstream re-reads the cookie.
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use taskman_shared::auth::session::{create_session_token, decode_session, SessionClaims};
/// use taskman_shared::auth::Principal;
/// use taskman_shared::models::user::Role;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let secret = "an-hmac-secret-of-at-least-32-bytes!";
/// let claims = SessionClaims::new(Principal { user_id: 7, role: Role::User }, Duration::hours(12));
/// let token = create_session_token(&claims, secret)?;
///
/// let principal = decode_session(&token, secret)?;
/// assert_eq!(principal.user_id, 7);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::Principal;
use crate::models::user::Role;

/// Issuer written into and required from every session token
pub const SESSION_ISSUER: &str = "taskman";

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to create session token: {0}")]
    Create(String),

    #[error("session has expired")]
    Expired,

    #[error("invalid session: {0}")]
    Invalid(String),
}

/// Session token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id
    pub sub: i64,

    /// Role at login time
    pub role: Role,

    pub iss: String,

    pub iat: i64,

    pub nbf: i64,

    pub exp: i64,
}

impl SessionClaims {
    /// Claims for `principal`, valid from now for `ttl`
    ///
    /// An expiry past the representable range saturates.
    pub fn new(principal: Principal, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: principal.user_id,
            role: principal.role,
            iss: SESSION_ISSUER.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: now
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
                .timestamp(),
        }
    }

    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.sub,
            role: self.role,
        }
    }
}

/// Signs session claims with HS256
pub fn create_session_token(claims: &SessionClaims, secret: &str) -> Result<String, SessionError> {
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&Header::new(Algorithm::HS256), claims, &key)
        .map_err(|e| SessionError::Create(e.to_string()))
}

/// Validates a session token and returns the caller it identifies
///
/// Checks signature, issuer, `exp` and `nbf`.
pub fn decode_session(token: &str, secret: &str) -> Result<Principal, SessionError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => SessionError::Expired,
        _ => SessionError::Invalid(e.to_string()),
    })?;

    Ok(data.claims.principal())
}
