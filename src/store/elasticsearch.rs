//! Elasticsearch-backed log store.
//!
//! # Responsibilities
//! - Create documents with an explicit id (`PUT /{index}/_create/{id}`)
//! - Fetch documents by id (`GET /{index}/_doc/{id}`)
//! - Administrative index calls used at startup and by the CLI
//! - Classify responses into `StoreError`

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use url::Url;

use crate::config::StoreConfig;
use crate::model::{LogDocument, LogEntry, LogId};
use crate::observability::metrics;
use crate::store::{LogStore, StoreError, StoreResult};

const ALREADY_EXISTS: &str = "resource_already_exists_exception";

/// Log store speaking the Elasticsearch REST API.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ElasticsearchStore {
    client: Client,
    base_url: Url,
    index: String,
}

/// Identity of the cluster answering `GET /`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterInfo {
    pub node_name: String,
    pub cluster_name: String,
    pub version: String,
}

#[derive(Deserialize)]
struct GetResponse {
    found: bool,
    #[serde(rename = "_source")]
    source: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct InfoResponse {
    name: String,
    cluster_name: String,
    version: InfoVersion,
}

#[derive(Deserialize)]
struct InfoVersion {
    number: String,
}

impl ElasticsearchStore {
    /// Build the store and its connection pool. Does not contact the cluster.
    pub fn new(config: &StoreConfig) -> StoreResult<Self> {
        let base_url = Url::parse(&config.url).map_err(|e| {
            StoreError::Unavailable(format!("invalid store URL '{}': {}", config.url, e))
        })?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            index: config.index.clone(),
        })
    }

    /// Index this store writes to.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Query cluster identity. Used as a connectivity probe.
    pub async fn ping(&self) -> StoreResult<ClusterInfo> {
        let response = self
            .client
            .get(self.url(&[]))
            .send()
            .await
            .map_err(unavailable)?;

        if !response.status().is_success() {
            return Err(rejected(response).await);
        }

        let bytes = response.bytes().await.map_err(unavailable)?;
        let info: InfoResponse = serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode {
            id: "/".to_string(),
            reason: e.to_string(),
        })?;

        Ok(ClusterInfo {
            node_name: info.name,
            cluster_name: info.cluster_name,
            version: info.version.number,
        })
    }

    /// Create the index if missing. Returns `true` when it was created now.
    pub async fn ensure_index(&self) -> StoreResult<bool> {
        let response = self
            .client
            .put(self.url(&[&self.index]))
            .send()
            .await
            .map_err(unavailable)?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST && body.contains(ALREADY_EXISTS) {
            return Ok(false);
        }
        Err(StoreError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    /// Drop the whole index and every document in it.
    pub async fn delete_index(&self) -> StoreResult<()> {
        let response = self
            .client
            .delete(self.url(&[&self.index]))
            .send()
            .await
            .map_err(unavailable)?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => Err(StoreError::NotFound {
                id: self.index.clone(),
            }),
            _ => Err(rejected(response).await),
        }
    }

    async fn create_document(&self, entry: &LogEntry) -> StoreResult<()> {
        let id = entry.id().to_string();
        let body = serde_json::to_vec(&entry.to_document())
            .map_err(|e| StoreError::Encode(e.to_string()))?;

        let response = self
            .client
            .put(self.url(&[&self.index, "_create", &id]))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(unavailable)?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::CONFLICT => Err(StoreError::Conflict { id }),
            _ => Err(rejected(response).await),
        }
    }

    async fn get_document(&self, id: &LogId) -> StoreResult<LogEntry> {
        let key = id.to_string();
        let response = self
            .client
            .get(self.url(&[&self.index, "_doc", &key]))
            .send()
            .await
            .map_err(unavailable)?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(StoreError::NotFound { id: key }),
            status if !status.is_success() => return Err(rejected(response).await),
            _ => {}
        }

        let bytes = response.bytes().await.map_err(unavailable)?;
        let decode = |reason: String| StoreError::Decode {
            id: key.clone(),
            reason,
        };

        let hit: GetResponse =
            serde_json::from_slice(&bytes).map_err(|e| decode(e.to_string()))?;
        if !hit.found {
            return Err(StoreError::NotFound { id: key.clone() });
        }

        let source = hit
            .source
            .ok_or_else(|| decode("response has no _source".to_string()))?;
        let document: LogDocument =
            serde_json::from_value(source).map_err(|e| decode(e.to_string()))?;

        Ok(LogEntry::from_document(*id, document))
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

#[async_trait]
impl LogStore for ElasticsearchStore {
    async fn insert(&self, entry: &LogEntry) -> StoreResult<()> {
        let start = Instant::now();
        let result = self.create_document(entry).await;
        metrics::record_store_operation("insert", outcome(&result), start);
        result
    }

    async fn find_one(&self, id: &LogId) -> StoreResult<LogEntry> {
        let start = Instant::now();
        let result = self.get_document(id).await;
        metrics::record_store_operation("find_one", outcome(&result), start);
        result
    }
}

impl std::fmt::Debug for ElasticsearchStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchStore")
            .field("url", &self.base_url.as_str())
            .field("index", &self.index)
            .finish()
    }
}

fn outcome<T>(result: &StoreResult<T>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    }
}

fn unavailable(e: reqwest::Error) -> StoreError {
    if e.is_timeout() {
        StoreError::Unavailable(format!("timed out: {}", e))
    } else {
        StoreError::Unavailable(e.to_string())
    }
}

async fn rejected(response: Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    StoreError::Rejected { status, body }
}
