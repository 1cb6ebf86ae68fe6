//! Job board listing service binary

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use jobboard_api::{build_router, AppState, Args};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("jobboard_api={}", level).parse()?)
                .add_directive(format!("jobboard_core={}", level).parse()?)
                .add_directive("tower_http=debug".parse()?),
        )
        .init();

    info!("Initializing job board API...");
    let state = Arc::new(AppState::new(&args).await?);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting job board API on http://{}", addr);
    info!("Latest panel size: {}", args.latest_limit);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
