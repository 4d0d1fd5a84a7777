//! The persisted log record.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::model::severity::Severity;

/// Identifier assigned to a log entry at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogId(Uuid);

impl LogId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for LogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Text that is not a log id in its issued form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid log id {0:?}")]
pub struct InvalidLogId(pub String);

impl FromStr for LogId {
    type Err = InvalidLogId;

    /// Only the lowercase hyphenated form is accepted, so one id has one
    /// spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = Uuid::parse_str(s).map_err(|_| InvalidLogId(s.to_string()))?;
        if id.hyphenated().to_string() != s {
            return Err(InvalidLogId(s.to_string()));
        }
        Ok(Self(id))
    }
}

impl From<Uuid> for LogId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// A stored log entry. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    id: LogId,
    timestamp: DateTime<Utc>,
    correlation_id: String,
    severity: Severity,
    message: String,
}

impl LogEntry {
    /// Build a new entry with a fresh id and the current server time.
    ///
    /// Empty `correlation_id` and `message` are accepted.
    pub fn new(
        correlation_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: LogId::generate(),
            timestamp: Utc::now(),
            correlation_id: correlation_id.into(),
            severity,
            message: message.into(),
        }
    }

    /// Reassemble an entry read back from the store.
    pub fn from_document(id: LogId, document: LogDocument) -> Self {
        Self {
            id,
            timestamp: document.timestamp,
            correlation_id: document.correlation_id,
            severity: document.severity,
            message: document.message,
        }
    }

    /// Body persisted under the entry's id.
    pub fn to_document(&self) -> LogDocument {
        LogDocument {
            timestamp: self.timestamp,
            correlation_id: self.correlation_id.clone(),
            severity: self.severity,
            message: self.message.clone(),
        }
    }

    pub fn id(&self) -> LogId {
        self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Document body as stored. The id lives outside the body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDocument {
    pub timestamp: DateTime<Utc>,
    pub correlation_id: String,
    pub severity: Severity,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_assigns_unique_ids() {
        let ids: HashSet<LogId> = (0..1000)
            .map(|_| LogEntry::new("c", Severity::Debug, "m").id())
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_new_stamps_server_time() {
        let before = Utc::now();
        let entry = LogEntry::new("admin_testing", Severity::Informational, "This is a test log.");
        let after = Utc::now();

        assert!(entry.timestamp() >= before);
        assert!(entry.timestamp() <= after);
        assert_eq!(entry.correlation_id(), "admin_testing");
        assert_eq!(entry.severity(), Severity::Informational);
        assert_eq!(entry.message(), "This is a test log.");
    }

    #[test]
    fn test_empty_strings_accepted() {
        let entry = LogEntry::new("", Severity::Notice, "");
        assert_eq!(entry.correlation_id(), "");
        assert_eq!(entry.message(), "");
    }

    #[test]
    fn test_document_shape() {
        let entry = LogEntry::new("req-1", Severity::Warning, "disk almost full");
        let value = serde_json::to_value(entry.to_document()).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 4);
        assert!(!object.contains_key("id"));
        assert_eq!(object["severity"], "WARNING");
        assert_eq!(object["correlation_id"], "req-1");
        assert_eq!(object["message"], "disk almost full");

        let timestamp = object["timestamp"].as_str().unwrap();
        let parsed = DateTime::parse_from_rfc3339(timestamp).unwrap();
        assert_eq!(parsed.with_timezone(&Utc), entry.timestamp());
    }

    #[test]
    fn test_document_reassembly_keeps_fields() {
        let entry = LogEntry::new("req-2", Severity::Alert, "pager");
        let rebuilt = LogEntry::from_document(entry.id(), entry.to_document());
        assert_eq!(rebuilt, entry);
    }

    #[test]
    fn test_entry_serializes_id_as_string() {
        let entry = LogEntry::new("c", Severity::Error, "boom");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], entry.id().to_string());
        assert_eq!(value["severity"], "ERROR");
    }

    #[test]
    fn test_log_id_parse() {
        let id: LogId = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
        assert_eq!(id.to_string(), "67e55044-10b1-426f-9247-bb680e5fe0c8");
        assert!("not-a-uuid".parse::<LogId>().is_err());
    }

    #[test]
    fn test_log_id_rejects_alternate_spellings() {
        for alias in [
            "67E55044-10B1-426F-9247-BB680E5FE0C8",
            "{67e55044-10b1-426f-9247-bb680e5fe0c8}",
            "67e5504410b1426f9247bb680e5fe0c8",
            "urn:uuid:67e55044-10b1-426f-9247-bb680e5fe0c8",
        ] {
            assert_eq!(
                alias.parse::<LogId>(),
                Err(InvalidLogId(alias.to_string())),
                "{alias}"
            );
        }
    }
}
