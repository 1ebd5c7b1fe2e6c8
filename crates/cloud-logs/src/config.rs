// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::error::ConfigError;
use crate::fetcher::DEFAULT_LIMIT;
use std::env;
use std::path::PathBuf;

/// Service-account document mounted into the app's pod.
pub const DEFAULT_CREDENTIALS_PATH: &str = "/secrets/django_app/logging-credentials.json";
pub const DEFAULT_LOGGING_API_URL: &str = "https://logging.googleapis.com";
pub const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for reading the app's logs
#[derive(Debug, Clone)]
pub struct Config {
    /// Google Cloud project id the app is deployed to
    pub project_id: String,
    /// Name of the generated project, used for cluster and container names
    pub project_name: String,
    /// Maximum number of entries to return
    pub limit: usize,
    /// Service-account credential document used on Kubernetes Engine
    pub credentials_path: PathBuf,
    /// Base URL of the Cloud Logging API
    pub logging_api_url: String,
    /// Host (and optional port) of the metadata server used on App Engine
    pub metadata_host: String,
    /// Timeout for each HTTP request, in seconds
    pub timeout_secs: u64,
    /// HTTPS proxy URL
    pub https_proxy: Option<String>,
    /// Log level (e.g., trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            project_name: String::new(),
            limit: DEFAULT_LIMIT,
            credentials_path: PathBuf::from(DEFAULT_CREDENTIALS_PATH),
            logging_api_url: DEFAULT_LOGGING_API_URL.to_string(),
            metadata_host: DEFAULT_METADATA_HOST.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            https_proxy: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let project_id = env::var("CLOUD_LOGS_PROJECT_ID").unwrap_or_default();
        let project_name = env::var("CLOUD_LOGS_PROJECT_NAME").unwrap_or_default();
        let limit = env::var("CLOUD_LOGS_LIMIT")
            .ok()
            .and_then(|limit| limit.parse::<usize>().ok())
            .unwrap_or(defaults.limit);
        let credentials_path = env::var_os("CLOUD_LOGS_CREDENTIALS_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.credentials_path);
        // CLOUD_LOGS_API_URL will primarily be used for integration tests
        let logging_api_url = env::var("CLOUD_LOGS_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.logging_api_url);
        let metadata_host = env::var("GCE_METADATA_HOST").unwrap_or(defaults.metadata_host);
        let timeout_secs = env::var("CLOUD_LOGS_TIMEOUT_SECS")
            .ok()
            .and_then(|secs| secs.parse::<u64>().ok())
            .unwrap_or(defaults.timeout_secs);
        let https_proxy = env::var("CLOUD_LOGS_PROXY_HTTPS")
            .or_else(|_| env::var("HTTPS_PROXY"))
            .ok();
        let log_level = env::var("CLOUD_LOGS_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or(defaults.log_level);

        let config = Self {
            project_id,
            project_name,
            limit,
            credentials_path,
            logging_api_url,
            metadata_host,
            timeout_secs,
            https_proxy,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "CLOUD_LOGS_PROJECT_ID cannot be empty".to_string(),
            ));
        }

        if self.project_name.trim().is_empty() {
            return Err(ConfigError::InvalidConfig(
                "CLOUD_LOGS_PROJECT_NAME cannot be empty".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidConfig(
                "Request timeout must be greater than 0".to_string(),
            ));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(ConfigError::InvalidConfig(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }
}
