use anyhow::Result;
use palfun::config::Config;
use palfun::server::{self, AppState};
use tracing_subscriber;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/palfun.toml".to_string());

    let config = Config::load_or_default(&config_path)?;
    let normalizer = palfun::build_normalizer(&config, false)?;

    server::serve(&config.server.bind_addr, AppState { normalizer }).await?;

    Ok(())
}
