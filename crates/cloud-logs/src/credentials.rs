// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Access tokens for the Cloud Logging API.
//!
//! Two sources are supported:
//! - **Metadata server**: the ambient service account of the App Engine instance.
//! - **Service-account document**: a JSON key file, exchanged for a token through a
//!   signed JWT assertion (RFC 7523 bearer grant).

use std::fmt::{self, Debug};
use std::fs;
use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CredentialError;

/// Read-only access to log entries.
pub const LOGGING_READ_SCOPE: &str = "https://www.googleapis.com/auth/logging.read";
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const METADATA_TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Service-account key document, as downloaded from IAM.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(rename = "type")]
    pub key_type: String,
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key_id", &self.private_key_id)
            .field("project_id", &self.project_id)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, CredentialError> {
        let contents = fs::read_to_string(path).map_err(|source| CredentialError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> Result<Self, CredentialError> {
        let key: ServiceAccountKey = serde_json::from_str(contents)?;
        if key.key_type != "service_account" {
            return Err(CredentialError::UnsupportedType(key.key_type));
        }
        Ok(key)
    }

    /// Signs a JWT assertion requesting `scope`, valid for one hour from `now`.
    pub fn assertion(&self, scope: &str, now: DateTime<Utc>) -> Result<String, CredentialError> {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.private_key_id.clone();

        let iat = now.timestamp();
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())?;
        Ok(jsonwebtoken::encode(&header, &claims, &key)?)
    }
}

/// Bearer token attached to logging API requests.
#[derive(Clone)]
pub struct AccessToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    pub fn secret(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }
}

impl Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_access_token(self, now: DateTime<Utc>) -> AccessToken {
        let expires_at = self
            .expires_in
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime));
        AccessToken::new(self.access_token, expires_at)
    }
}

async fn read_token_response(response: reqwest::Response) -> Result<AccessToken, CredentialError> {
    let status = response.status();
    if !status.is_success() {
        return Err(CredentialError::Rejected {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        });
    }
    let token: TokenResponse = response.json().await?;
    Ok(token.into_access_token(Utc::now()))
}

/// Exchanges a signed assertion for an access token at the key's token endpoint.
pub async fn exchange_service_account_key(
    http: &Client,
    key: &ServiceAccountKey,
    scope: &str,
) -> Result<AccessToken, CredentialError> {
    let assertion = key.assertion(scope, Utc::now())?;
    debug!(
        "Requesting access token for {} from {}",
        key.client_email, key.token_uri
    );

    let response = http
        .post(&key.token_uri)
        .form(&[
            ("grant_type", JWT_BEARER_GRANT_TYPE),
            ("assertion", assertion.as_str()),
        ])
        .send()
        .await?;
    read_token_response(response).await
}

/// Fetches an access token for the instance's default service account.
pub async fn fetch_metadata_token(
    http: &Client,
    metadata_host: &str,
) -> Result<AccessToken, CredentialError> {
    let url = format!("http://{metadata_host}{METADATA_TOKEN_PATH}");
    debug!("Requesting access token from metadata server at {metadata_host}");

    let response = http
        .get(url)
        .header("Metadata-Flavor", "Google")
        .send()
        .await?;
    read_token_response(response).await
}
