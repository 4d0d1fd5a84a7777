//! Client for the log ingestion HTTP API.

mod client;

pub use client::{CreatedLog, LogClient, LogRecord, NewLog, SdkError};
