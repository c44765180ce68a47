use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use api::app;
use api::config::Config;
use api::jobs::{ExpiryScanJob, JobScheduler, PendingReminderJob};
use api::middleware::{init_metrics, logging::init_logging};
use api::services::{TmdbCatalog, TwilioSmsSender};
use domain::services::{Catalog, MockCatalog, MockSmsSender, SmsSender};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()?;

    // Initialize logging and metrics
    init_logging(&config.logging);
    init_metrics();

    info!("Starting StreamRequest API v{}", env!("CARGO_PKG_VERSION"));

    // Create database pool
    let pool = persistence::db::create_pool(&config.database).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    let catalog = build_catalog(&config);
    let sms = build_sms_sender(&config);

    // Build application
    let app = app::create_app(config.clone(), pool.clone(), catalog, sms.clone());

    // Start background jobs if enabled
    let scheduler = if config.jobs.enabled {
        let mut scheduler = JobScheduler::new();
        scheduler.register(ExpiryScanJob::new(
            pool.clone(),
            sms.clone(),
            config.jobs.expiry_scan_minutes,
        ));
        scheduler.register(PendingReminderJob::new(
            pool,
            sms,
            config.jobs.pending_reminder_minutes,
        ));
        scheduler.start();
        Some(scheduler)
    } else {
        info!("Background jobs disabled, relying on cron endpoints");
        None
    };

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(scheduler) = scheduler {
        scheduler.shutdown();
        scheduler.wait_for_shutdown(Duration::from_secs(10)).await;
    }

    Ok(())
}

/// Resolves on SIGINT or SIGTERM so the server and jobs can drain.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

fn build_catalog(config: &Config) -> Arc<dyn Catalog> {
    if config.tmdb.api_key.is_empty() {
        info!("TMDB API key not set, using mock catalog");
        Arc::new(MockCatalog::empty())
    } else {
        Arc::new(TmdbCatalog::new(&config.tmdb))
    }
}

fn build_sms_sender(config: &Config) -> Arc<dyn SmsSender> {
    if config.twilio.enabled {
        Arc::new(TwilioSmsSender::new(&config.twilio))
    } else {
        info!("Twilio disabled, outbound SMS will be logged only");
        Arc::new(MockSmsSender::new())
    }
}
