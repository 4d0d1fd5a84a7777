use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLog {
    pub correlation_id: String,
    pub severity: String, // e.g. "INFORMATIONAL"
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedLog {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: String,
    pub timestamp: String, // RFC3339
    pub correlation_id: String,
    pub severity: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

impl SdkError {
    /// HTTP status, when the service answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            SdkError::Status { status, .. } => Some(*status),
            SdkError::Transport(e) => e.status(),
        }
    }
}

pub struct LogClient {
    client: Client,
    base_url: String,
}

impl LogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Submit a log entry; returns the id the service assigned.
    pub async fn create_log(&self, log: &NewLog) -> Result<CreatedLog, SdkError> {
        let resp = self
            .client
            .post(format!("{}/api/v1/logs", self.base_url))
            .json(log)
            .send()
            .await?;
        decode(resp).await
    }

    /// Fetch a log entry by id.
    pub async fn get_log(&self, id: &str) -> Result<LogRecord, SdkError> {
        let resp = self
            .client
            .get(format!("{}/api/v1/logs/{}", self.base_url, id))
            .send()
            .await?;
        decode(resp).await
    }

    /// Liveness probe.
    pub async fn health(&self) -> Result<serde_json::Value, SdkError> {
        let resp = self
            .client
            .get(format!("{}/healthz", self.base_url))
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, SdkError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(SdkError::Status { status, body });
    }
    Ok(resp.json().await?)
}
