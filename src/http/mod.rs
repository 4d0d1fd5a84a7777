//! HTTP adapter over the ingestion service.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, tower middleware stack)
//!     → request.rs (assign/propagate x-request-id, tracing span)
//!     → handlers.rs (decode JSON body or path id)
//!     → IngestService (create / get)
//!     → error.rs (map failures onto status codes)
//!     → JSON response to client
//! ```
//!
//! # Design Decisions
//! - Handlers never touch the store directly; every store call goes
//!   through `IngestService`
//! - Error bodies are always `{"error": "<message>"}`

pub mod error;
pub mod handlers;
pub mod request;
pub mod server;

pub use error::ApiError;
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
