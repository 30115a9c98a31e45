use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wonders_api::auth::ensure_bootstrap_admin;
use wonders_api::config::ServerConfig;
use wonders_api::router::build_app_router;
use wonders_api::state::AppState;
use wonders_api::storage::LocalBlobStore;
use wonders_db::{
    AccountStore, InquiryStore, MemoryAccountStore, MemoryInquiryStore, PgAccountStore,
    PgInquiryStore,
};
use wonders_events::EventBus;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // LOG_FORMAT=json switches to one JSON object per line.
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wonders_api=debug,wonders_db=info,tower_http=debug".into()),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Stores ---
    let (inquiries, accounts): (Arc<dyn InquiryStore>, Arc<dyn AccountStore>) =
        match &config.database_url {
            Some(database_url) => {
                let pool = wonders_db::create_pool(database_url)
                    .await
                    .expect("Failed to connect to database");
                tracing::info!("Database connection pool created");

                wonders_db::health_check(&pool)
                    .await
                    .expect("Database health check failed");
                tracing::info!("Database health check passed");

                wonders_db::run_migrations(&pool)
                    .await
                    .expect("Failed to run database migrations");
                tracing::info!("Database migrations applied");

                (
                    Arc::new(PgInquiryStore::new(pool.clone())),
                    Arc::new(PgAccountStore::new(pool)),
                )
            }
            None => {
                tracing::warn!("DATABASE_URL not set, using in-memory stores (data is lost on exit)");
                (
                    Arc::new(MemoryInquiryStore::new()),
                    Arc::new(MemoryAccountStore::new()),
                )
            }
        };

    // --- Blob storage ---
    tokio::fs::create_dir_all(&config.blob.root)
        .await
        .expect("Failed to create blob storage directory");
    let blobs = Arc::new(LocalBlobStore::new(
        config.blob.root.clone(),
        config.blob.public_base_url.clone(),
    ));
    tracing::info!(root = %config.blob.root.display(), "Blob storage ready");

    // --- Bootstrap operator ---
    if let Some(admin) = &config.bootstrap_admin {
        ensure_bootstrap_admin(accounts.as_ref(), admin)
            .await
            .expect("Failed to create bootstrap operator account");
    }

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());

    // --- App state ---
    let state = AppState {
        inquiries,
        accounts,
        blobs,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    let drain = Duration::from_secs(config.shutdown_timeout_secs);

    // Live-feed sockets hold connections open; bound the drain.
    tokio::select! {
        result = server => result.expect("Server error"),
        () = async {
            shutdown_signal().await;
            tokio::time::sleep(drain).await;
        } => {
            tracing::warn!(timeout_secs = drain.as_secs(), "Shutdown drain timed out");
        }
    }

    // Dropping the last bus handle closes every live feed still following it.
    drop(event_bus);
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
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
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
