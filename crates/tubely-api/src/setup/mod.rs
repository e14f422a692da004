//! Application setup and initialization
//!
//! Everything `main` needs to go from a loaded [`Config`] to a serving router.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoRepository;
use tubely_processing::FfprobeClassifier;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    crate::telemetry::init_telemetry(json_logs)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;
    let classifier = FfprobeClassifier::new(config.ffprobe_path(), config.probe_timeout())
        .context("Invalid FFPROBE_PATH")?;

    let videos = Arc::new(VideoRepository::new(pool.clone()));
    let state = services::build_state(
        config,
        Some(pool),
        videos,
        storage,
        Arc::new(classifier),
    );

    let router = routes::build_router(state.clone());

    Ok((state, router))
}
