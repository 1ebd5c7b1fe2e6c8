// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use cloud_logs::Config;
use mockito::ServerGuard;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

pub const METADATA_TOKEN_PATH: &str =
    "/computeMetadata/v1/instance/service-accounts/default/token";
pub const ENTRIES_LIST_PATH: &str = "/v2/entries:list";

const TEST_PRIVATE_KEY: &str = include_str!("../fixtures/service_account_key.pem");

/// Writes a service-account document whose token endpoint points at `server`.
pub fn write_credentials(server: &ServerGuard) -> NamedTempFile {
    let doc = json!({
        "type": "service_account",
        "project_id": "proj1",
        "private_key_id": "key-1",
        "private_key": TEST_PRIVATE_KEY,
        "client_email": "logs-reader@proj1.iam.gserviceaccount.com",
        "token_uri": format!("{}/token", server.url()),
    });
    let mut file = NamedTempFile::new().expect("failed to create credential file");
    file.write_all(doc.to_string().as_bytes())
        .expect("failed to write credential file");
    file
}

/// Config with every outbound endpoint pointed at `server`.
pub fn config_for(server: &ServerGuard, limit: usize) -> Config {
    Config {
        project_id: "proj1".to_string(),
        project_name: "myapp".to_string(),
        limit,
        logging_api_url: server.url(),
        metadata_host: server.host_with_port(),
        timeout_secs: 5,
        ..Default::default()
    }
}

pub fn token_body(token: &str) -> String {
    json!({ "access_token": token, "expires_in": 3599, "token_type": "Bearer" }).to_string()
}

pub fn entries_body(payloads: &[&str], next_page_token: Option<&str>) -> String {
    let entries = payloads
        .iter()
        .map(|p| json!({ "textPayload": p }))
        .collect::<Vec<_>>();
    let mut body = json!({ "entries": entries });
    if let Some(token) = next_page_token {
        body["nextPageToken"] = json!(token);
    }
    body.to_string()
}
