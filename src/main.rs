//! Litera server — the authentication core of the Litera platform.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use litera_api::state::AppState;
use litera_auth::audit::{AuditSink, SqlAuditSink};
use litera_auth::flow::AuthService;
use litera_auth::password::PasswordHasher;
use litera_auth::rbac::AccessPolicy;
use litera_auth::store::{CredentialStore, SqlCredentialStore};
use litera_auth::token::TokenCodec;
use litera_core::config::AppConfig;
use litera_core::error::AppError;
use litera_database::connection::DatabasePool;
use litera_database::repositories::{AccountRepository, AuditRepository};
use litera_worker::monitor::ExecutionMonitor;
use litera_worker::runner::TaskRunner;

#[tokio::main]
async fn main() {
    let env = std::env::var("LITERA_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Litera v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection ──────────────────────────────
    let db = DatabasePool::connect(&config.database).await?;
    let pool = db.pool().clone();

    // ── Step 2: Repositories ─────────────────────────────────────
    let account_repo = Arc::new(AccountRepository::new(pool.clone()));
    let audit_repo = Arc::new(AuditRepository::new(pool.clone()));

    // ── Step 3: Auth system ──────────────────────────────────────
    // An unusable signing secret is fatal here, before any request is served.
    tracing::info!("Initializing authentication system...");
    let hasher = PasswordHasher::new();
    let codec = Arc::new(TokenCodec::new(&config.auth)?);
    let store: Arc<dyn CredentialStore> = Arc::new(SqlCredentialStore::new(
        Arc::clone(&account_repo),
        hasher.clone(),
    ));
    let audit: Arc<dyn AuditSink> = Arc::new(SqlAuditSink::new(Arc::clone(&audit_repo)));

    // ── Step 4: Task substrate + execution monitor ───────────────
    let monitor = Arc::new(ExecutionMonitor::new());
    let runner = Arc::new(TaskRunner::new(
        Arc::clone(&monitor),
        Duration::from_secs(config.auth.uniqueness_check_timeout_seconds),
    ));

    let auth_service = Arc::new(AuthService::new(
        Arc::clone(&store),
        Arc::clone(&audit),
        hasher,
        Arc::clone(&codec),
        Arc::clone(&runner),
    ));
    let policy = Arc::new(AccessPolicy::new());

    // ── Step 5: Shutdown channel + monitor loop ──────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let monitor_handle = if config.monitor.enabled {
        let interval = Duration::from_secs(config.monitor.interval_seconds);
        Some(tokio::spawn(
            Arc::clone(&monitor).run(interval, shutdown_rx.clone()),
        ))
    } else {
        tracing::info!("Execution monitor disabled");
        None
    };

    // ── Step 6: Build and start HTTP server ──────────────────────
    let state = AppState {
        config: Arc::new(config.clone()),
        codec,
        store,
        audit,
        auth_service,
        policy,
        monitor,
    };
    let app = litera_api::router::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Litera server listening on {addr}");

    // ── Step 7: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(handle) = monitor_handle {
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
    }

    db.close().await;
    tracing::info!("Litera server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
