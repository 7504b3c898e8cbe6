//! Goal Chat - a goal-planning chat client
//!
//! Serves a single chat page and relays each turn to a remote planning
//! assistant, tracking which stage of the planning conversation it is in
//! and rendering the assistant's Markdown replies safely.

mod api;
mod client;
mod config;
mod conversation;
mod render;
mod session;

use api::{create_router, AppState};
use client::{HttpChatService, LoggingService};
use config::AppConfig;
use session::ChatSession;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "goal_chat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    // Configuration
    let config = AppConfig::from_env()?;
    tracing::info!(
        endpoint = %config.endpoint,
        locale = config.locale.tag(),
        timeout_secs = config.timeout.as_secs(),
        "Configuration loaded"
    );

    // Assistant client
    let service = HttpChatService::new(&config.endpoint, config.timeout)?;
    let service = Arc::new(LoggingService::new(Arc::new(service)));

    // Create application state
    let session = ChatSession::new(service, config.locale);
    let state = AppState::new(session);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let compression = CompressionLayer::new()
        .gzip(true)
        .br(true)
        .deflate(true)
        .zstd(true);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(compression);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Goal chat listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
