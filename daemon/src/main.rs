use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use wavectld::config;
use wavectld::output::dispatch::{spawn_output_worker, CommandDispatcher};
use wavectld::rate_limit::CommandRateLimiter;
use wavectld::server::DaemonServer;
use wavectld::state::DaemonState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::INFO)
        .with_target(false)
        .with_env_filter(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()))
        .init();

    info!("wavectl daemon (wavectld) starting...");

    let config = config::load_config()?;

    let limiter = CommandRateLimiter::new(
        config.rate_limit.commands_per_second,
        config.rate_limit.burst_capacity,
        config.rate_limit.enabled,
    );
    let (tx, rx) = mpsc::unbounded_channel();
    let _output_worker = spawn_output_worker(&config.output, limiter, rx)?;

    let state = Arc::new(DaemonState::new(config, CommandDispatcher::new(tx)));
    let server = DaemonServer::new(shared::ipc::socket_path(), state);
    server.run().await?;

    Ok(())
}
