mod auth;
mod config;
mod credentials;
mod server;
mod tools;

use anyhow::Result;
use tracing_subscriber::{self, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = config::Config::from_env();
    tracing::info!(stage = %config.stage, port = config.port, "apod-mcp starting");
    tracing::info!("clients must provide Authorization: Bearer YOUR_API_KEY");

    let addr = ("0.0.0.0", config.port);
    let app = server::build_router(config);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("listening on {}:{}", addr.0, addr.1);
    axum::serve(listener, app).await?;

    Ok(())
}
