mod config;
mod dto;
mod handlers;
mod models;
mod repository;
mod service;
mod summarizer;

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

use handlers::rest;
use repository::Repository;
use service::NoteService;
use summarizer::Summarizer;

#[tokio::main]
async fn main() {
    // Log setup, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to locate or load config: {e}");
    });
    tracing::info!("Successfully loaded journal server config");

    let api_key = config::api_key_from_env();
    if api_key.is_none() {
        tracing::warn!(
            "{} is not set, summary requests for non-empty days will fail",
            config::API_KEY_ENV
        );
    }

    // Store and summarizer creation
    let repo = Arc::new(RwLock::new(Repository::new(cfg.max_notes)));
    let summarizer = Summarizer::new(&cfg.summarizer, api_key).unwrap_or_else(|e| {
        tracing::error!("Failed to create summarizer client: {e}");
        panic!("failed to create summarizer client: {e}");
    });

    // Service creation
    let service = Arc::new(NoteService::new(repo, Arc::new(summarizer)));

    let router = rest::router(service);

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr())
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to {}: {e}", cfg.bind_addr());
            panic!("failed to bind to address: {e}");
        });

    tracing::info!(
        "Journal server starting, listening on {}",
        cfg.bind_addr()
    );

    axum::serve(listener, router)
        .await
        .expect("failed to start server");
}
