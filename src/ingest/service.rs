//! Create and fetch log entries.

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{InvalidSeverity, LogEntry, LogId, Severity};
use crate::store::{LogStore, StoreError};

/// Caller-supplied fields of a new log entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateLog {
    pub correlation_id: String,
    /// Severity name; parsed before anything reaches the store.
    pub severity: String,
    pub message: String,
}

/// Errors surfaced by the ingest service.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    InvalidSeverity(#[from] InvalidSeverity),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for ingest operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Assigns ids and timestamps, then delegates to the store.
///
/// Holds no state besides the shared store handle.
#[derive(Clone)]
pub struct IngestService {
    store: Arc<dyn LogStore>,
}

impl IngestService {
    pub fn new(store: Arc<dyn LogStore>) -> Self {
        Self { store }
    }

    /// Persist a new entry and return its generated id.
    pub async fn create(&self, request: CreateLog) -> IngestResult<LogId> {
        let severity: Severity = request.severity.parse()?;
        let entry = LogEntry::new(request.correlation_id, severity, request.message);

        self.store.insert(&entry).await?;
        Ok(entry.id())
    }

    /// Fetch a previously created entry.
    pub async fn get(&self, id: &LogId) -> IngestResult<LogEntry> {
        Ok(self.store.find_one(id).await?)
    }
}

impl fmt::Debug for IngestService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreResult};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request(correlation_id: &str, severity: &str, message: &str) -> CreateLog {
        CreateLog {
            correlation_id: correlation_id.to_string(),
            severity: severity.to_string(),
            message: message.to_string(),
        }
    }

    /// Store that counts calls and fails every one with the given error.
    struct FailingStore {
        calls: AtomicUsize,
        error: fn() -> StoreError,
    }

    #[async_trait]
    impl LogStore for FailingStore {
        async fn insert(&self, _entry: &LogEntry) -> StoreResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err((self.error)())
        }

        async fn find_one(&self, _id: &LogId) -> StoreResult<LogEntry> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err((self.error)())
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let service = IngestService::new(Arc::new(MemoryStore::new()));
        let before = Utc::now();

        let id = service
            .create(request("admin_testing", "INFORMATIONAL", "This is a test log."))
            .await
            .unwrap();
        let entry = service.get(&id).await.unwrap();

        assert_eq!(entry.id(), id);
        assert_eq!(entry.correlation_id(), "admin_testing");
        assert_eq!(entry.severity(), Severity::Informational);
        assert_eq!(entry.message(), "This is a test log.");
        assert!(entry.timestamp() >= before);
    }

    #[tokio::test]
    async fn test_create_returns_fresh_ids() {
        let service = IngestService::new(Arc::new(MemoryStore::new()));
        let mut ids = HashSet::new();
        for _ in 0..100 {
            let id = service.create(request("c", "DEBUG", "m")).await.unwrap();
            assert!(ids.insert(id));
        }
    }

    #[tokio::test]
    async fn test_invalid_severity_never_reaches_store() {
        let store = Arc::new(MemoryStore::new());
        let service = IngestService::new(store.clone());

        let err = service
            .create(request("x", "NOT_A_LEVEL", "y"))
            .await
            .unwrap_err();
        match err {
            IngestError::InvalidSeverity(InvalidSeverity(text)) => assert_eq!(text, "NOT_A_LEVEL"),
            other => panic!("expected invalid severity, got {other:?}"),
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let service = IngestService::new(Arc::new(MemoryStore::new()));
        let id = LogEntry::new("c", Severity::Debug, "m").id();

        let err = service.get(&id).await.unwrap_err();
        assert!(matches!(err, IngestError::Store(StoreError::NotFound { .. })), "got {err:?}");
    }

    #[tokio::test]
    async fn test_store_errors_pass_through_without_retry() {
        let store = Arc::new(FailingStore {
            calls: AtomicUsize::new(0),
            error: || StoreError::Unavailable("connection refused".to_string()),
        });
        let service = IngestService::new(store.clone());

        let err = service.create(request("c", "ERROR", "m")).await.unwrap_err();
        assert!(matches!(err, IngestError::Store(StoreError::Unavailable(_))));
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);

        let conflicting = IngestService::new(Arc::new(FailingStore {
            calls: AtomicUsize::new(0),
            error: || StoreError::Conflict { id: "taken".to_string() },
        }));
        let err = conflicting.create(request("c", "ERROR", "m")).await.unwrap_err();
        assert!(matches!(err, IngestError::Store(StoreError::Conflict { .. })));
    }
}
