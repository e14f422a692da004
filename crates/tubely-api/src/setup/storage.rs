//! Storage backend setup

use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::Config;
use tubely_storage::{create_storage, Storage};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    match config.s3_endpoint() {
        Some(endpoint) => tracing::info!(
            backend = %storage.backend_type(),
            endpoint = %endpoint,
            "Storage backend initialized (custom endpoint)"
        ),
        None => tracing::info!(backend = %storage.backend_type(), "Storage backend initialized"),
    }

    Ok(storage)
}
