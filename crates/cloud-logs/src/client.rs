// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Debug};
use std::path::PathBuf;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::credentials::{
    exchange_service_account_key, fetch_metadata_token, AccessToken, ServiceAccountKey,
    LOGGING_READ_SCOPE,
};
use crate::error::{CredentialError, FetchError};
use crate::fetcher::LogEntry;
use crate::filter::LogFilter;
use crate::http::get_client;
use crate::platform::Platform;

pub const ENTRIES_LIST_PATH: &str = "/v2/entries:list";
const ORDER_BY_NEWEST_FIRST: &str = "timestamp desc";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListEntriesRequest<'a> {
    resource_names: Vec<String>,
    filter: &'a str,
    order_by: &'a str,
    page_size: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

/// One page of an `entries:list` response.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntriesPage {
    #[serde(default)]
    pub entries: Vec<LogEntry>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl EntriesPage {
    /// Token for the next page, if the listing continues.
    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}

/// Authenticated handle to the Cloud Logging API for one project.
#[derive(Clone)]
pub struct LoggingClient {
    http: Client,
    api_url: String,
    project_id: String,
    token: AccessToken,
}

impl Debug for LoggingClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingClient")
            .field("api_url", &self.api_url)
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl LoggingClient {
    pub fn new(
        http: Client,
        api_url: impl Into<String>,
        project_id: impl Into<String>,
        token: AccessToken,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            project_id: project_id.into(),
            token,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Requests a single page of entries matching `filter`, newest first.
    pub async fn list_page(
        &self,
        filter: &LogFilter,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<EntriesPage, FetchError> {
        let request = ListEntriesRequest {
            resource_names: vec![format!("projects/{}", self.project_id)],
            filter: filter.as_str(),
            order_by: ORDER_BY_NEWEST_FIRST,
            page_size,
            page_token,
        };
        debug!(
            "Listing log entries for project {} (page size {page_size}, continued: {})",
            self.project_id,
            page_token.is_some()
        );

        let response = self
            .http
            .post(format!("{}{ENTRIES_LIST_PATH}", self.api_url))
            .bearer_auth(self.token.secret())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Rejected {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }
}

/// Builds a [`LoggingClient`] with the credential strategy of the hosting platform.
#[derive(Debug, Clone)]
pub struct ClientFactory {
    http: Client,
    project_id: String,
    credentials_path: PathBuf,
    metadata_host: String,
    logging_api_url: String,
}

impl ClientFactory {
    pub fn new(config: &Config) -> Self {
        Self {
            http: get_client(config),
            project_id: config.project_id.clone(),
            credentials_path: config.credentials_path.clone(),
            metadata_host: config.metadata_host.clone(),
            logging_api_url: config.logging_api_url.clone(),
        }
    }

    /// Creates a client for `platform`.
    ///
    /// On App Engine the instance's own identity is used. On Kubernetes Engine the
    /// mounted service-account document is exchanged for a read-only token.
    pub async fn create_client(
        &self,
        platform: Platform,
    ) -> Result<LoggingClient, CredentialError> {
        let token = match platform {
            Platform::ManagedApp => fetch_metadata_token(&self.http, &self.metadata_host).await?,
            Platform::Orchestrated => {
                let key = ServiceAccountKey::from_file(&self.credentials_path)?;
                exchange_service_account_key(&self.http, &key, LOGGING_READ_SCOPE).await?
            }
        };
        match token.expires_at() {
            Some(expires_at) => {
                debug!("Created logging client for {platform}, token expires at {expires_at}")
            }
            None => debug!("Created logging client for {platform}"),
        }

        Ok(LoggingClient::new(
            self.http.clone(),
            self.logging_api_url.clone(),
            self.project_id.clone(),
            token,
        ))
    }
}
