// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

/// Errors raised while loading configuration from the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors that prevent a logging client from being constructed
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Failed to read credential file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed credential document: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Unsupported credential type '{0}', expected 'service_account'")]
    UnsupportedType(String),

    #[error("Failed to sign token assertion: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("Token request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status}: Token request rejected: {body}")]
    Rejected { status: u16, body: String },
}

/// Errors raised while listing log entries
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Log listing request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status}: Log listing rejected: {body}")]
    Rejected { status: u16, body: String },
}
