use anyhow::{Context, Result};
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use itinerary_planner::config::Config;
use itinerary_planner::{build_state, handlers};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "itinerary_planner=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config = Config::load();

    let state = build_state(&config).context("failed to initialise service clients")?;
    let app = handlers::router(state);

    let bind: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("invalid server.bind address: {}", config.server.bind))?;
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(
        %bind,
        model = %config.llm.model,
        "Starting itinerary planner"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
