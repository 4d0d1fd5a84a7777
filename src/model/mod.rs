//! Log entity model.
//!
//! # Data Flow
//! ```text
//! client text ("WARNING")
//!     → severity.rs (name-based parse, never ordinals)
//!     → entry.rs (LogEntry: server-assigned id + timestamp)
//!     → LogDocument (body written to the store under the id)
//! ```

pub mod entry;
pub mod severity;

pub use entry::{InvalidLogId, LogDocument, LogEntry, LogId};
pub use severity::{InvalidSeverity, Severity};
