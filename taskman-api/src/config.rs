/// Configuration management for the API server
///
/// # Environment Variables
///
/// - `API_HOST`: host to bind to (default: 0.0.0.0)
/// - `API_PORT`: port to bind to (default: 8080)
/// - `CORS_ORIGINS`: comma-separated allowed origins, `*` for any (default: *)
/// - `DATABASE_URL`: PostgreSQL connection string (required)
/// - `DATABASE_MAX_CONNECTIONS`: pool size (default: 10)
/// - `DATABASE_STATEMENT_TIMEOUT_SECONDS`: per-statement timeout, 0 disables (default: 30)
/// - `SESSION_SECRET`: HMAC key for session tokens, at least 32 characters (required)
/// - `SESSION_TTL_HOURS`: session lifetime, at most one year (default: 12)
/// - `COOKIE_SECURE`: mark the session cookie `Secure` (default: false)
/// - `BOOTSTRAP_ADMIN_LOGIN` / `BOOTSTRAP_ADMIN_PASSWORD`: administrator created at startup if missing
/// - `RUST_LOG`, `LOG_FORMAT`: read by the tracing setup in `main`
///
/// # Example
///
/// ```no_run
/// use taskman_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;
use std::str::FromStr;

use taskman_shared::db::pool::DatabaseConfig;

/// Minimum accepted length of `SESSION_SECRET`
pub const MIN_SESSION_SECRET_LEN: usize = 32;

/// Longest accepted `SESSION_TTL_HOURS`
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub database: DatabaseSettings,
    pub session: SessionConfig,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    /// `None` leaves the server default in place
    pub statement_timeout_seconds: Option<u64>,
}

/// Session cookie configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// HMAC key for session tokens
    pub secret: String,
    pub ttl_hours: i64,
    pub cookie_secure: bool,
}

/// Administrator account ensured at startup
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub login: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid value for {}: {}", key, e)),
        None => Ok(default),
    }
}

impl Config {
    /// Loads configuration from the process environment (and `.env`, if present)
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing, a value does not
    /// parse, or `SESSION_SECRET` is shorter than 32 characters.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let host = lookup("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "API_PORT", 8080u16)?;
        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let url = lookup("DATABASE_URL")
            .ok_or_else(|| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10u32)?;
        let statement_timeout_seconds =
            match parse_or(&lookup, "DATABASE_STATEMENT_TIMEOUT_SECONDS", 30u64)? {
                0 => None,
                secs => Some(secs),
            };

        let secret = lookup("SESSION_SECRET")
            .ok_or_else(|| anyhow::anyhow!("SESSION_SECRET environment variable is required"))?;
        if secret.len() < MIN_SESSION_SECRET_LEN {
            anyhow::bail!(
                "SESSION_SECRET must be at least {} characters long",
                MIN_SESSION_SECRET_LEN
            );
        }
        let ttl_hours = parse_or(&lookup, "SESSION_TTL_HOURS", 12i64)?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&ttl_hours) {
            anyhow::bail!(
                "SESSION_TTL_HOURS must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            );
        }
        let cookie_secure = parse_or(&lookup, "COOKIE_SECURE", false)?;

        let bootstrap_admin = match (lookup("BOOTSTRAP_ADMIN_LOGIN"), lookup("BOOTSTRAP_ADMIN_PASSWORD")) {
            (Some(login), Some(password)) => Some(BootstrapAdmin { login, password }),
            (None, None) => None,
            _ => anyhow::bail!(
                "BOOTSTRAP_ADMIN_LOGIN and BOOTSTRAP_ADMIN_PASSWORD must be set together"
            ),
        };

        Ok(Self {
            api: ApiConfig {
                host,
                port,
                cors_origins,
            },
            database: DatabaseSettings {
                url,
                max_connections,
                statement_timeout_seconds,
            },
            session: SessionConfig {
                secret,
                ttl_hours,
                cookie_secure,
            },
            bootstrap_admin,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Pool settings for [`taskman_shared::db::pool::create_pool`]
    pub fn pool_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
            max_connections: self.database.max_connections,
            statement_timeout_seconds: self.database.statement_timeout_seconds,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("DATABASE_URL", "postgresql://localhost/taskman"),
            ("SESSION_SECRET", SECRET),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = load(&minimal()).unwrap();

        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.api.cors_origins, vec!["*".to_string()]);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.statement_timeout_seconds, Some(30));
        assert_eq!(config.session.ttl_hours, 12);
        assert!(!config.session.cookie_secure);
        assert!(config.bootstrap_admin.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut vars = minimal();
        vars.extend([
            ("API_HOST", "127.0.0.1"),
            ("API_PORT", "3000"),
            ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ("DATABASE_STATEMENT_TIMEOUT_SECONDS", "0"),
            ("COOKIE_SECURE", "true"),
            ("BOOTSTRAP_ADMIN_LOGIN", "root"),
            ("BOOTSTRAP_ADMIN_PASSWORD", "changeme"),
        ]);
        let config = load(&vars).unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.api.cors_origins.len(), 2);
        assert_eq!(config.database.statement_timeout_seconds, None);
        assert!(config.session.cookie_secure);
        assert_eq!(config.bootstrap_admin.unwrap().login, "root");
    }

    #[test]
    fn test_session_ttl_bounds() {
        for ttl in ["0", "-1", "8761", "9223372036854775807"] {
            let mut vars = minimal();
            vars.push(("SESSION_TTL_HOURS", ttl));
            assert!(load(&vars).is_err(), "ttl {}", ttl);
        }

        let mut vars = minimal();
        vars.push(("SESSION_TTL_HOURS", "8760"));
        assert_eq!(load(&vars).unwrap().session.ttl_hours, MAX_SESSION_TTL_HOURS);
    }

    #[test]
    fn test_missing_required() {
        assert!(load(&[("SESSION_SECRET", SECRET)]).is_err());
        assert!(load(&[("DATABASE_URL", "postgresql://localhost/taskman")]).is_err());
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = load(&[
            ("DATABASE_URL", "postgresql://localhost/taskman"),
            ("SESSION_SECRET", "too-short"),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("SESSION_SECRET"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut vars = minimal();
        vars.push(("API_PORT", "eighty"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_half_configured_bootstrap_rejected() {
        let mut vars = minimal();
        vars.push(("BOOTSTRAP_ADMIN_LOGIN", "root"));
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_bootstrap_password_redacted_in_debug() {
        let admin = BootstrapAdmin {
            login: "root".to_string(),
            password: "changeme".to_string(),
        };
        assert!(!format!("{:?}", admin).contains("changeme"));
    }
}
