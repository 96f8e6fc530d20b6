//! Arena - authoritative game server binary.
//!
//! Usage: `arena [CONFIG]` (defaults to `config.toml`).

use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Arena Game Server v{} (pid {})", env!("CARGO_PKG_VERSION"), std::process::id());

    // Load configuration
    let config = match std::env::args_os().nth(1) {
        Some(path) => server::Config::load_from(path)?,
        None => server::Config::load()?,
    };
    info!("Loaded configuration");
    info!("  Port: {}", config.server.port);
    info!("  Board: {}x{}", config.board.width, config.board.height);
    info!("  Max coins: {}", config.coin.max_count);

    // Runs until SIGINT/SIGTERM
    server::run(config).await?;

    Ok(())
}
