//! Process-local log store.
//!
//! Same create/get semantics as the Elasticsearch store. Documents are kept in
//! their serialized form so reads go through the same decode path.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::model::{LogDocument, LogEntry, LogId};
use crate::store::{LogStore, StoreError, StoreResult};

/// In-memory store keyed by log id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: DashMap<LogId, serde_json::Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Store a raw document body under `id`, bypassing serialization.
    pub fn put_raw(&self, id: LogId, document: serde_json::Value) {
        self.documents.insert(id, document);
    }
}

#[async_trait]
impl LogStore for MemoryStore {
    async fn insert(&self, entry: &LogEntry) -> StoreResult<()> {
        let document = serde_json::to_value(entry.to_document())
            .map_err(|e| StoreError::Encode(e.to_string()))?;

        match self.documents.entry(entry.id()) {
            Entry::Occupied(_) => Err(StoreError::Conflict {
                id: entry.id().to_string(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(document);
                Ok(())
            }
        }
    }

    async fn find_one(&self, id: &LogId) -> StoreResult<LogEntry> {
        let document = self
            .documents
            .get(id)
            .map(|doc| doc.value().clone())
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        let document: LogDocument =
            serde_json::from_value(document).map_err(|e| StoreError::Decode {
                id: id.to_string(),
                reason: e.to_string(),
            })?;

        Ok(LogEntry::from_document(*id, document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = MemoryStore::new();
        let entry = LogEntry::new("admin_testing", Severity::Informational, "This is a test log.");

        store.insert(&entry).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.find_one(&entry.id()).await.unwrap(), entry);
    }

    #[tokio::test]
    async fn test_duplicate_id_conflicts() {
        let store = MemoryStore::new();
        let entry = LogEntry::new("c", Severity::Debug, "m");

        store.insert(&entry).await.unwrap();
        let err = store.insert(&entry).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }), "got {err:?}");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_is_not_found() {
        let store = MemoryStore::new();
        let id = LogEntry::new("c", Severity::Debug, "m").id();

        let err = store.find_one(&id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_drifted_document_is_decode_error() {
        let store = MemoryStore::new();
        let id = LogEntry::new("c", Severity::Debug, "m").id();
        store.put_raw(id, json!({"timestamp": "2024-01-01T00:00:00Z", "severity": "INFO"}));

        let err = store.find_one(&id).await.unwrap_err();
        assert!(matches!(err, StoreError::Decode { .. }), "got {err:?}");
    }
}
