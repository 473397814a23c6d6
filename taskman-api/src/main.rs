//! # Taskman API Server
//!
//! Startup sequence:
//!
//! 1. tracing (`RUST_LOG`, `LOG_FORMAT=json` for JSON lines)
//! 2. configuration from the environment
//! 3. database (created if missing), pool and embedded migrations
//! 4. bootstrap administrator, if configured
//! 5. serve until Ctrl+C / SIGTERM, then close the pool
//!
//! ```bash
//! cargo run -p taskman-api
//! ```

use taskman_api::{
    app::{build_router, AppState},
    config::Config,
};
use taskman_shared::db::{
    migrations::{ensure_database_exists, get_migration_status, run_migrations},
    pool::{close_pool, create_pool},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "taskman_api=debug,taskman_shared=info,tower_http=debug".into());

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Taskman API Server v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    ensure_database_exists(&config.database.url).await?;
    let pool = create_pool(config.pool_config()).await?;
    run_migrations(&pool).await?;

    let status = get_migration_status(&pool).await?;
    if status.is_up_to_date {
        tracing::info!(
            applied = status.applied_migrations,
            latest_version = ?status.latest_version,
            "Database schema up to date"
        );
    } else {
        tracing::warn!(
            applied = status.applied_migrations,
            latest_version = ?status.latest_version,
            "Database schema behind embedded migrations"
        );
    }

    let bind_address = config.bind_address();
    let bootstrap_admin = config.bootstrap_admin.clone();
    let state = AppState::new(pool.clone(), config);

    if let Some(admin) = bootstrap_admin {
        if state.users.ensure_admin(&admin.login, &admin.password).await? {
            tracing::info!(login = %admin.login, "Bootstrap administrator created");
        } else {
            tracing::debug!(login = %admin.login, "Bootstrap administrator already present");
        }
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
