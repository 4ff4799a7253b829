use anyhow::Context;
use mock_server::{app, app_with_token};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")))
        .with_writer(std::io::stderr)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await.with_context(|| format!("bind {addr}"))?;

    let router = match std::env::var("API_TOKEN").ok().filter(|t| !t.is_empty()) {
        Some(token) => app_with_token(token),
        None => app(),
    };
    mock_server::serve(listener, router).await.context("serve")
}
