//! albumhaul - yearly soundtrack-album acquisition tool.
//!
//! Crawls a per-year movie-song index and downloads the album archives it
//! links to, one report per year.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if albumhaul::cli::is_verbose() {
        "albumhaul=info"
    } else {
        "albumhaul=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    albumhaul::cli::run().await
}
