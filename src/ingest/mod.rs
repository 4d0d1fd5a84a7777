//! Log ingestion service.
//!
//! # Data Flow
//! ```text
//! CreateLog { correlation_id, severity text, message }
//!     → parse severity (InvalidSeverity stops here, no store call)
//!     → LogEntry::new (fresh id, server timestamp)
//!     → LogStore::insert
//!     → LogId
//!
//! LogId → LogStore::find_one → LogEntry
//! ```
//!
//! # Design Decisions
//! - Stateless: the store is the only source of truth
//! - Errors propagate unchanged; the HTTP layer decides status and logging

pub mod service;

pub use service::{CreateLog, IngestError, IngestResult, IngestService};
