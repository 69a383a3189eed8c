use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use bot_admin_api::app::{create_router, AppState};
use bot_admin_api::config::Config;
use bot_admin_api::jobs::{
    AdvertisementBroadcastJob, DeliveryWorkerJob, JobScheduler, PoolMetricsJob, RateLimitPruneJob,
};
use bot_admin_api::middleware::{init_metrics, logging::init_logging};
use bot_admin_api::services::{AdvertisementDeliverer, DeliveryQueue, TelegramClient};
use domain::services::BotApi;
use tracing::{info, warn};

const JOB_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load and validate configuration
    let config = Config::load()?;

    init_logging(&config.logging)?;
    init_metrics()?;

    info!("Starting Bot Admin API v{}", env!("CARGO_PKG_VERSION"));

    // Create database pool
    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

    info!("Running database migrations...");
    persistence::db::run_migrations(&pool).await?;
    info!("Migrations completed");

    if !config.telegram.is_configured() {
        warn!("No bot token configured; outbound Telegram calls will fail");
    }
    let bot: Arc<dyn BotApi> = Arc::new(TelegramClient::new(&config.telegram)?);

    let addr = config.socket_addr()?;
    let state = AppState::new(config, pool.clone(), bot.clone());
    let config = state.config.clone();

    // Background jobs
    let mut scheduler = JobScheduler::new();
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    if let Some(limiter) = &state.rate_limiter {
        scheduler.register(RateLimitPruneJob::new(limiter.clone()));
    }
    if config.delivery.enabled {
        let deliverer = AdvertisementDeliverer::new(
            pool.clone(),
            bot,
            config.media.public_base_url.clone(),
            config.delivery.recipient_page_size,
        );
        scheduler.register(DeliveryWorkerJob::new(
            deliverer,
            DeliveryQueue::new(pool.clone()),
            config.delivery.poll_interval_secs,
            config.delivery.batch_size,
            config.delivery.max_attempts,
        ));
        scheduler.register(AdvertisementBroadcastJob::new(
            pool.clone(),
            config.delivery.broadcast_interval_minutes,
        ));
    } else {
        info!("Advertisement delivery disabled in this process");
    }
    scheduler.start();

    let app = create_router(state);

    info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(JOB_SHUTDOWN_TIMEOUT).await;
    pool.close().await;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
