//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpListener;

use log_ingest::config::ServiceConfig;
use log_ingest::http::HttpServer;
use log_ingest::ingest::IngestService;
use log_ingest::lifecycle::Shutdown;
use log_ingest::model::{LogEntry, LogId};
use log_ingest::store::{LogStore, StoreError, StoreResult};

/// A running service bound to an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the full HTTP server over `store`.
pub async fn start_server(store: Arc<dyn LogStore>) -> TestServer {
    start_server_with(ServiceConfig::default(), store).await
}

/// Start the full HTTP server with a custom config.
pub async fn start_server_with(config: ServiceConfig, store: Arc<dyn LogStore>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, IngestService::new(store));

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Give the accept loop a moment.
    tokio::time::sleep(Duration::from_millis(50)).await;

    TestServer { addr, shutdown }
}

/// Store whose every call fails with a fixed error.
#[allow(dead_code)]
pub struct BrokenStore {
    pub error: fn() -> StoreError,
}

#[async_trait]
impl LogStore for BrokenStore {
    async fn insert(&self, _entry: &LogEntry) -> StoreResult<()> {
        Err((self.error)())
    }

    async fn find_one(&self, _id: &LogId) -> StoreResult<LogEntry> {
        Err((self.error)())
    }
}
