//! Log ingestion service library.

pub mod config;
pub mod http;
pub mod ingest;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod store;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use ingest::IngestService;
pub use lifecycle::Shutdown;
