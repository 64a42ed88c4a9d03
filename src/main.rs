use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vinilos::cli::{self, Cli};

fn configure_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("vinilos=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    configure_logging();

    let cli = Cli::parse();
    cli::run(cli).await
}
