use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use pwreset::config::Config;
use pwreset::email::{LogMailer, Notifier, SmtpMailer};
use pwreset::store::postgres::PgStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Load config; bad field names or TTL strings fail here, not per request
    let config = Config::from_env().expect("Failed to load configuration");

    // Init tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!("Starting pwreset");

    // Create database pool
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    tracing::info!("Migrations applied");

    let notifier: Arc<dyn Notifier> = match config.smtp.as_ref() {
        Some(smtp) => match SmtpMailer::new(smtp, &config.base_url) {
            Ok(mailer) => {
                tracing::info!("SMTP configured");
                Arc::new(mailer)
            }
            Err(e) => {
                tracing::warn!("SMTP not available, logging tokens instead: {e}");
                Arc::new(LogMailer)
            }
        },
        None => Arc::new(LogMailer),
    };

    let addr = SocketAddr::new(config.host, config.port);
    let app = pwreset::build_app(Arc::new(PgStore::new(pool)), notifier, config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
