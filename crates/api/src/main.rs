use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cradle_api::background;
use cradle_api::config::ServerConfig;
use cradle_api::notifications::NotificationDispatcher;
use cradle_api::router::build_app_router;
use cradle_api::state::AppState;
use cradle_events::{EmailConfig, EmailDelivery, EventBus};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cradle_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = cradle_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    cradle_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    cradle_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());

    let email = EmailConfig::from_env().map(|cfg| {
        tracing::info!(smtp_host = %cfg.smtp_host, "Email delivery enabled");
        Arc::new(EmailDelivery::new(cfg))
    });
    if email.is_none() {
        tracing::warn!("SMTP_HOST not set, purchase emails will not be sent");
    }

    let dispatcher = NotificationDispatcher::new(pool.clone(), email);
    let dispatcher_handle = tokio::spawn(dispatcher.run(event_bus.subscribe()));

    // --- App state ---
    let state = AppState::new(pool.clone(), Arc::new(config.clone()), Arc::clone(&event_bus));

    // --- Counter reconciliation ---
    let cancel = CancellationToken::new();
    let reconcile_handle = if config.reconcile_interval_secs > 0 {
        Some(tokio::spawn(background::reconciliation::run(
            pool,
            state.reconciler.clone(),
            Duration::from_secs(config.reconcile_interval_secs),
            cancel.clone(),
        )))
    } else {
        tracing::info!("Counter reconciliation job disabled");
        None
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

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let drain = Duration::from_secs(config.shutdown_timeout_secs);

    cancel.cancel();
    if let Some(handle) = reconcile_handle {
        let _ = tokio::time::timeout(drain, handle).await;
    }
    tracing::info!("Counter reconciliation job stopped");

    // The router held the last state clone; dropping our bus handle closes
    // the channel so the dispatcher drains and exits.
    drop(event_bus);
    let _ = tokio::time::timeout(drain, dispatcher_handle).await;
    tracing::info!("Notification dispatcher shut down");

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
