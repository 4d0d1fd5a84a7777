//! Document store subsystem.
//!
//! # Data Flow
//! ```text
//! IngestService
//!     → LogStore::insert(entry)   → create-by-id  → Conflict | Ok
//!     → LogStore::find_one(id)    → get-by-id     → NotFound | LogEntry
//!
//! Implementations:
//!     elasticsearch.rs (REST API over a pooled reqwest client)
//!     memory.rs        (process-local map, same semantics)
//! ```
//!
//! # Design Decisions
//! - Stores classify failures and return them; they never log
//! - One store handle is built at startup and shared behind an Arc
//! - No retries: a failed call surfaces immediately

pub mod elasticsearch;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{LogEntry, LogId};

pub use elasticsearch::{ClusterInfo, ElasticsearchStore};
pub use memory::MemoryStore;

/// Classified failure of a store call.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A document already exists under this id.
    #[error("document {id} already exists")]
    Conflict { id: String },

    /// No document exists under this id.
    #[error("document {id} not found")]
    NotFound { id: String },

    /// The store could not be reached (connect, timeout, broken body).
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with an unexpected status.
    #[error("store rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// A stored document could not be read back as a log entry.
    #[error("stored document {id} is unreadable: {reason}")]
    Decode { id: String, reason: String },

    /// An entry could not be serialized for storage.
    #[error("failed to encode document: {0}")]
    Encode(String),
}

impl StoreError {
    /// Short label used in metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Conflict { .. } => "conflict",
            StoreError::NotFound { .. } => "not_found",
            StoreError::Unavailable(_) => "unavailable",
            StoreError::Rejected { .. } => "rejected",
            StoreError::Decode { .. } => "decode_error",
            StoreError::Encode(_) => "encode_error",
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Per-document create and get against a document store.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Create the entry under its own id. Fails with `Conflict` if taken.
    async fn insert(&self, entry: &LogEntry) -> StoreResult<()>;

    /// Fetch the entry stored under `id`.
    async fn find_one(&self, id: &LogId) -> StoreResult<LogEntry>;
}
