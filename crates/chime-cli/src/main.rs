use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use chime_core::app::config::DEFAULT_BIND_ADDRESS;
use chime_core::app::{SchedulerBuilder, ServerConfig, router};

/// chime: 指定時刻に JSON を POST するだけのインメモリ・スケジューラ
///
/// Example:
///   chime --bind 127.0.0.1:8080 --delivery-timeout-secs 5
#[derive(Debug, Parser)]
#[command(name = "chime", about = "In-memory HTTP callback scheduler", long_about = None)]
struct Cli {
    /// Listener address for the HTTP API.
    #[arg(long = "bind", default_value = DEFAULT_BIND_ADDRESS)]
    bind: String,

    /// Timeout for each outbound callback, in seconds.
    #[arg(long = "delivery-timeout-secs", default_value_t = 10)]
    delivery_timeout_secs: u64,
}

impl Cli {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_address: self.bind.clone(),
            delivery_timeout: Duration::from_secs(self.delivery_timeout_secs),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG で上書き可能（例: RUST_LOG=chime_core=debug）
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().server_config();
    info!(
        bind = %config.bind_address,
        delivery_timeout_secs = config.delivery_timeout.as_secs(),
        "configuration"
    );

    let scheduler = Arc::new(
        SchedulerBuilder::new()
            .config(&config)
            .build()
            .context("failed to build scheduler")?,
    );

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address))?;
    info!(addr = %config.bind_address, "server starting");

    axum::serve(listener, router(Arc::clone(&scheduler)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    // 未発火のタスクは保存しない
    let abandoned = scheduler.shutdown();
    if abandoned > 0 {
        warn!(abandoned, "pending tasks dropped at shutdown");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
