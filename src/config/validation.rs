//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs and value ranges
//! - Enforce Elasticsearch index naming rules
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{ServiceConfig, StoreBackend};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const INDEX_FORBIDDEN: [char; 11] = ['/', '\\', '*', '?', '"', '<', '>', '|', ',', '#', ' '];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("store.url: '{0}' is not an http(s) URL")]
    InvalidStoreUrl(String),

    #[error("store.index: '{index}' {reason}")]
    InvalidIndex { index: String, reason: &'static str },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("observability.log_level: unknown level '{0}'")]
    UnknownLogLevel(String),
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.listener.max_body_size == 0 {
        errors.push(ValidationError::Zero("listener.max_body_size"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    if config.store.backend == StoreBackend::Elasticsearch {
        match url::Url::parse(&config.store.url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            _ => errors.push(ValidationError::InvalidStoreUrl(config.store.url.clone())),
        }
        if let Err(reason) = check_index_name(&config.store.index) {
            errors.push(ValidationError::InvalidIndex {
                index: config.store.index.clone(),
                reason,
            });
        }
        if config.store.connect_timeout_secs == 0 {
            errors.push(ValidationError::Zero("store.connect_timeout_secs"));
        }
        if config.store.request_timeout_secs == 0 {
            errors.push(ValidationError::Zero("store.request_timeout_secs"));
        }
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_index_name(index: &str) -> Result<(), &'static str> {
    if index.is_empty() {
        return Err("must not be empty");
    }
    if index.chars().any(|c| c.is_uppercase()) {
        return Err("must be lowercase");
    }
    if index.contains(INDEX_FORBIDDEN) {
        return Err("contains a forbidden character");
    }
    if index.starts_with(['-', '_', '+']) {
        return Err("must not start with '-', '_' or '+'");
    }
    if index == "." || index == ".." {
        return Err("must not be '.' or '..'");
    }
    Ok(())
}
