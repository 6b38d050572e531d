use tracing::info;
use tracing_subscriber::EnvFilter;

use flink_dashboard::{config::Config, locator::create_job_locator, metrics, server::Server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    info!("Loaded configuration: {:?}", config);

    metrics::register_metrics();

    let locator = create_job_locator(&config).await?;

    let addr = config.server.addr.clone();
    let server = Server::new(config, locator);
    info!("Starting server on {addr}");
    server.start(&addr).await?;

    Ok(())
}
