/// Application state and router builder
///
/// `AppState` is built once in `main` and handed to [`build_router`]; there is
/// no process-wide router or server singleton.
///
/// # Example
///
/// ```no_run
/// use taskman_api::{app::{build_router, AppState}, config::Config};
/// use taskman_shared::db::pool::create_pool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(config.pool_config()).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::session::require_session, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskman_shared::service::{TaskService, UserService};
use taskman_shared::store::{PgTaskStore, PgUserStore, TaskStore, UserStore};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through the `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (health checks only; entity access goes through the services)
    pub db: PgPool,

    pub tasks: TaskService,

    pub users: UserService,

    pub config: Arc<Config>,
}

impl AppState {
    /// State backed by PostgreSQL stores on `db`
    pub fn new(db: PgPool, config: Config) -> Self {
        let user_store: Arc<dyn UserStore> = Arc::new(PgUserStore::new(db.clone()));
        let task_store: Arc<dyn TaskStore> = Arc::new(PgTaskStore::new(db.clone()));

        Self::with_stores(db, user_store, task_store, config)
    }

    /// State over arbitrary stores
    pub fn with_stores(
        db: PgPool,
        user_store: Arc<dyn UserStore>,
        task_store: Arc<dyn TaskStore>,
        config: Config,
    ) -> Self {
        Self {
            db,
            tasks: TaskService::new(task_store, user_store.clone()),
            users: UserService::new(user_store),
            config: Arc::new(config),
        }
    }

    pub fn session_secret(&self) -> &str {
        &self.config.session.secret
    }
}

/// Builds the complete router
///
/// ```text
/// /
/// ├── GET /health
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /login
///     │   ├── POST /logout
///     │   └── GET  /me                       (session)
///     ├── /tasks/                            (session)
///     │   ├── GET, POST /
///     │   ├── GET, PUT, DELETE /:id
///     │   ├── GET /user/:login
///     │   ├── GET /by-status/:status
///     │   └── GET /by-priority/:priority
///     └── /users/                            (session)
///         ├── GET, POST /
///         └── PUT /:id/block
/// ```
///
/// Role checks happen in the services, not here.
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let public_auth_routes = Router::new()
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout));

    let task_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks).post(routes::tasks::create_task))
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .route("/user/:login", get(routes::tasks::list_tasks_by_user_login))
        .route("/by-status/:status", get(routes::tasks::list_tasks_by_status))
        .route("/by-priority/:priority", get(routes::tasks::list_tasks_by_priority));

    let user_routes = Router::new()
        .route("/", get(routes::users::list_users).post(routes::users::create_user))
        .route("/:id/block", put(routes::users::block_user));

    let protected_routes = Router::new()
        .route("/auth/me", get(routes::auth::me))
        .nest("/tasks", task_routes)
        .nest("/users", user_routes)
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    let v1_routes = Router::new()
        .nest("/auth", public_auth_routes)
        .merge(protected_routes);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config.api.cors_origins))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        // Credentials cannot be combined with a wildcard origin.
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
