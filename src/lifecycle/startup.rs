//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the one store handle shared by every request
//! - Probe the store and prepare its index
//! - Wrap the store in the ingest service
//!
//! # Design Decisions
//! - An unreachable store is logged, not fatal; requests answer 502 until it recovers
//! - Failing to create the index when the store does answer is fatal

use std::sync::Arc;

use thiserror::Error;

use crate::config::{StoreBackend, StoreConfig};
use crate::ingest::IngestService;
use crate::store::{ElasticsearchStore, LogStore, MemoryStore, StoreError};

/// Error raised while bringing the service up.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to initialize store: {0}")]
    Store(#[from] StoreError),
}

/// Build the configured store.
pub async fn build_store(config: &StoreConfig) -> Result<Arc<dyn LogStore>, StartupError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; logs are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Elasticsearch => {
            let store = ElasticsearchStore::new(config)?;
            prepare_elasticsearch(&store, config.create_index).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Build the ingest service over the configured store.
pub async fn build_service(config: &StoreConfig) -> Result<IngestService, StartupError> {
    let store = build_store(config).await?;
    Ok(IngestService::new(store))
}

async fn prepare_elasticsearch(
    store: &ElasticsearchStore,
    create_index: bool,
) -> Result<(), StartupError> {
    match store.ping().await {
        Ok(info) => {
            tracing::info!(
                node = %info.node_name,
                cluster = %info.cluster_name,
                version = %info.version,
                "Connected to Elasticsearch"
            );
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Elasticsearch not reachable at startup; continuing"
            );
            return Ok(());
        }
    }

    if create_index {
        if store.ensure_index().await? {
            tracing::info!(index = %store.index(), "Created index");
        } else {
            tracing::debug!(index = %store.index(), "Index already exists");
        }
    }
    Ok(())
}
