use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

mod cli;

const DEFAULT_LOG_FILTER: &str = "info";

fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run(cli::Cli::parse()) {
        error!("{e:#}");
        // Logging may be filtered out; the failure must still reach the user.
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
