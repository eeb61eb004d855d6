use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use poi_server::config::AppConfig;
use poi_server::engine::MapEngine;
use poi_server::feed::HttpFeedClient;
use poi_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    let client = HttpFeedClient::new(config.feed.clone()).expect("Failed to create feed client");
    let engine = Arc::new(MapEngine::new(client, &config.cache));

    // Start serving even if the feeds are down; POST /reload retries.
    match engine.reload().await {
        Ok(report) => info!(generation = report.generation, "initial load complete"),
        Err(e) => error!(error = %e, "initial load failed"),
    }

    if let Some(period) = config.refresh {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await; // First tick is immediate, skip it
            loop {
                interval.tick().await;
                if let Err(e) = engine.reload().await {
                    error!(error = %e, "periodic reload failed");
                }
            }
        });
    }

    let app = create_router(AppState::new(engine));

    let addr = config.listen_addr;
    info!(%addr, feeds = %config.feed.base_url, "POI map server listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
