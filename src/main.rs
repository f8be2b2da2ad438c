#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use recipesnap::{
    build_app,
    config::Config,
    controller::Controller,
    gemini::GeminiClient,
    logging::init_logging,
    models::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // The API key is required: a missing credential aborts here, before
    // anything is bound or served.
    let config = Config::parse();

    // Keep guard alive so file logger flushes correctly
    let _log_guards = init_logging(&config);

    // Log all configuration (mask sensitive values)
    tracing::info!("=== Configuration ===");
    tracing::info!("Bind address: {}", config.bind);
    tracing::info!(
        "Log file: {}",
        config
            .log_file
            .as_ref()
            .map_or_else(|| "<stdout only>".to_string(), |p| p.display().to_string())
    );
    tracing::info!(
        "CORS origin: {}",
        config.cors_origin.as_deref().unwrap_or("<allow all>")
    );
    tracing::info!(
        "Gemini API key: {}",
        if config.gemini_api_key.is_empty() {
            "<not set>"
        } else {
            "<set>"
        }
    );
    tracing::info!("Gemini model: {}", config.gemini_model);
    tracing::info!("Gemini API URL: {}", config.gemini_api_url);
    tracing::info!("Prompt: {} chars", config.prompt.len());
    tracing::info!("====================");

    let source = GeminiClient::new(
        config.gemini_api_url.clone(),
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.prompt.clone(),
    );

    let state = AppState {
        controller: Arc::new(RwLock::new(Controller::new())),
        source: Arc::new(source),
        config: config.clone(),
    };

    let app = build_app(state);

    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!("Listening on http://{}", config.bind);
    axum::serve(listener, app).await?;
    Ok(())
}
