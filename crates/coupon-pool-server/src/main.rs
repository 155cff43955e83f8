#![doc = include_str!("../README.md")]

mod server;

use clap::Parser;
use coupon_pool::{CampaignRegistry, OsRandom, SystemClock};
use server::config::{CliArgs, ServerConfig};
use server::routes::router;
use server::service::handler::CouponService;
use server::telemetry::init_telemetry;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;

// mimalloc holds up better than the system allocator when many request tasks
// allocate coupon codes at once.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    let providers = init_telemetry()?;

    let registry = Arc::new(CampaignRegistry::new(
        config.code_length,
        OsRandom,
        SystemClock,
    ));
    let service = CouponService::new(config.clone(), registry);

    let listener = TcpListener::bind(&config.server_addr).await?;
    log_startup_info(&config);

    let result = axum::serve(listener, router(service.clone()))
        .with_graceful_shutdown(shutdown_signal(service))
        .await;

    #[cfg(feature = "tracing")]
    {
        match &result {
            Ok(()) => tracing::info!("Service shut down successfully"),
            Err(err) => tracing::error!("Server error: {err}"),
        }
    }

    providers.shutdown();
    result?;
    Ok(())
}

fn log_startup_info(_config: &ServerConfig) {
    if cfg!(debug_assertions) {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "Starting coupon service on {} with full config: {:#?}",
            _config.server_addr,
            _config
        );
    } else {
        #[cfg(feature = "tracing")]
        tracing::info!(
            "Starting coupon service on {} (max {} coupons per campaign)",
            _config.server_addr,
            _config.max_coupons_per_campaign
        );
    }
}

async fn shutdown_signal(service: CouponService) {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received Ctrl+C signal");
        },
        () = terminate => {
            #[cfg(feature = "tracing")]
            tracing::info!("Received SIGTERM signal");
        },
    }

    #[cfg(feature = "tracing")]
    tracing::info!("Shutdown signal received, draining in-flight requests...");

    service.set_not_serving();
}
