use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use log_ingest::config::StoreConfig;
use log_ingest::store::ElasticsearchStore;

#[derive(Parser)]
#[command(name = "log-cli")]
#[command(about = "Command-line client for the log ingestion service", long_about = None)]
struct Cli {
    /// Base URL of the running service.
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a log entry
    Create {
        #[arg(long)]
        correlation_id: String,
        /// EMERGENCY, ALERT, CRITICAL, ERROR, WARNING, NOTICE, INFORMATIONAL or DEBUG
        #[arg(long)]
        severity: String,
        #[arg(long)]
        message: String,
    },
    /// Fetch a log entry by id
    Get { id: String },
    /// Check service liveness
    Health,
    /// Delete the whole log index directly in Elasticsearch
    PurgeIndex {
        #[arg(long, default_value = "http://localhost:9200")]
        store_url: String,
        #[arg(long, default_value = "logs")]
        index: String,
        /// Required; deletion cannot be undone
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Create {
            correlation_id,
            severity,
            message,
        } => {
            let res = client
                .post(format!("{}/api/v1/logs", cli.url))
                .json(&json!({
                    "correlation_id": correlation_id,
                    "severity": severity,
                    "message": message,
                }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Get { id } => {
            let res = client
                .get(format!("{}/api/v1/logs/{}", cli.url, id))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/healthz", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::PurgeIndex {
            store_url,
            index,
            yes,
        } => {
            confirm_purge(&index, yes)?;
            let config = StoreConfig {
                url: store_url,
                index,
                ..StoreConfig::default()
            };
            let store = ElasticsearchStore::new(&config)?;
            store.delete_index().await?;
            println!("Deleted index '{}'", store.index());
        }
    }

    Ok(())
}

fn confirm_purge(index: &str, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes {
        return Err(format!("refusing to delete index '{}' without --yes", index).into());
    }
    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        let text = res.text().await.unwrap_or_default();
        return Err(format!("service returned status {}: {}", status, text).into());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_purge_requires_confirmation() {
        assert!(confirm_purge("logs", false).is_err());
        assert!(confirm_purge("logs", true).is_ok());
    }

    #[tokio::test]
    async fn test_error_status_is_reported_as_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/logs/missing");
                then.status(404).json_body(json!({"error": "log missing not found"}));
            })
            .await;

        let res = reqwest::get(server.url("/api/v1/logs/missing")).await.unwrap();
        let err = print_response(res).await.unwrap_err();
        assert!(err.to_string().contains("404"), "{err}");
    }

    #[tokio::test]
    async fn test_success_is_printed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/healthz");
                then.status(200).json_body(json!({"status": "ok"}));
            })
            .await;

        let res = reqwest::get(server.url("/healthz")).await.unwrap();
        assert!(print_response(res).await.is_ok());
    }
}
