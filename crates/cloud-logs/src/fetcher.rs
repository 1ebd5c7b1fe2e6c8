// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Bounded, newest-first reads of the app's log entries.

use std::collections::VecDeque;

use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::LoggingClient;
use crate::error::FetchError;
use crate::filter::LogFilter;

pub const DEFAULT_LIMIT: usize = 10;
/// Shown instead of log lines when no logging client is available.
pub const FALLBACK_MESSAGE: &str = "Check console for logs.";

/// A log entry as returned by the logging API. Only the payload is interpreted.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    #[serde(default)]
    pub text_payload: Option<String>,
    #[serde(default)]
    pub json_payload: Option<Value>,
    #[serde(default)]
    pub proto_payload: Option<Value>,
}

impl LogEntry {
    /// Returns the entry's payload as text.
    ///
    /// Structured payloads are rendered as compact JSON. Entries without a payload
    /// render as an empty string.
    pub fn payload(&self) -> String {
        if let Some(text) = &self.text_payload {
            return text.clone();
        }
        self.json_payload
            .as_ref()
            .or(self.proto_payload.as_ref())
            .map(Value::to_string)
            .unwrap_or_default()
    }
}

struct Pager<'a> {
    client: &'a LoggingClient,
    filter: &'a LogFilter,
    page_size: usize,
    buffered: VecDeque<LogEntry>,
    next_page_token: Option<String>,
    exhausted: bool,
}

impl Pager<'_> {
    async fn next_entry(&mut self) -> Result<Option<LogEntry>, FetchError> {
        loop {
            if let Some(entry) = self.buffered.pop_front() {
                return Ok(Some(entry));
            }
            if self.exhausted {
                return Ok(None);
            }

            let page = self
                .client
                .list_page(self.filter, self.page_size, self.next_page_token.as_deref())
                .await?;
            self.next_page_token = page.next_page_token().map(str::to_string);
            self.exhausted = self.next_page_token.is_none();
            self.buffered.extend(page.entries);
        }
    }
}

impl LoggingClient {
    /// Lazily lists entries matching `filter`, newest first.
    ///
    /// Pages are requested only when the consumer pulls past the buffered
    /// entries. The stream is single-pass: restarting means issuing the query again.
    pub fn entries<'a>(
        &'a self,
        filter: &'a LogFilter,
        page_size: usize,
    ) -> impl Stream<Item = Result<LogEntry, FetchError>> + 'a {
        let pager = Pager {
            client: self,
            filter,
            page_size,
            buffered: VecDeque::new(),
            next_page_token: None,
            exhausted: false,
        };
        stream::try_unfold(pager, |mut pager| async move {
            pager
                .next_entry()
                .await
                .map(|next| next.map(|entry| (entry, pager)))
        })
    }
}

/// Returns the payloads of at most `limit` entries matching `filter`, newest first.
///
/// Without a client the single [`FALLBACK_MESSAGE`] line is returned. Listing
/// errors are not retried.
pub async fn fetch_logs(
    client: Option<&LoggingClient>,
    filter: &LogFilter,
    limit: usize,
) -> Result<Vec<String>, FetchError> {
    let Some(client) = client else {
        info!("No logging client available, pointing to the console instead");
        return Ok(vec![FALLBACK_MESSAGE.to_string()]);
    };

    let payloads: Vec<String> = client
        .entries(filter, limit)
        .take(limit)
        .map_ok(|entry| entry.payload())
        .try_collect()
        .await?;
    debug!("Fetched {} log entries", payloads.len());
    Ok(payloads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ENTRIES_LIST_PATH;
    use crate::credentials::AccessToken;
    use crate::filter::build_filter;
    use crate::platform::Platform;
    use mockito::{Matcher, Mock, Server, ServerGuard};
    use serde_json::json;

    fn client_for(server: &ServerGuard) -> LoggingClient {
        LoggingClient::new(
            reqwest::Client::new(),
            server.url(),
            "proj1",
            AccessToken::new("ya29.token", None),
        )
    }

    fn text_entries(prefix: &str, count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| json!({ "textPayload": format!("{prefix}-{i}") }))
            .collect()
    }

    async fn mock_page(
        server: &mut ServerGuard,
        filter: &LogFilter,
        page_size: usize,
        page_token: Option<&str>,
        entries: Vec<Value>,
        next_page_token: Option<&str>,
        expected_hits: usize,
    ) -> Mock {
        let mut request = json!({
            "resourceNames": ["projects/proj1"],
            "filter": filter.as_str(),
            "orderBy": "timestamp desc",
            "pageSize": page_size,
        });
        if let Some(token) = page_token {
            request["pageToken"] = json!(token);
        }
        let mut response = json!({ "entries": entries });
        if let Some(token) = next_page_token {
            response["nextPageToken"] = json!(token);
        }

        server
            .mock("POST", ENTRIES_LIST_PATH)
            .match_body(Matcher::Json(request))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(response.to_string())
            .expect(expected_hits)
            .create_async()
            .await
    }

    #[test]
    fn test_payload_extraction() {
        let text: LogEntry =
            serde_json::from_value(json!({"textPayload": "GET / 200", "logName": "x"})).unwrap();
        assert_eq!(text.payload(), "GET / 200");

        let structured: LogEntry =
            serde_json::from_value(json!({"jsonPayload": {"message": "boom", "level": 3}}))
                .unwrap();
        let rendered: Value = serde_json::from_str(&structured.payload()).unwrap();
        assert_eq!(rendered, json!({"message": "boom", "level": 3}));

        let proto: LogEntry =
            serde_json::from_value(json!({"protoPayload": {"@type": "type.googleapis.com/x"}}))
                .unwrap();
        assert_eq!(proto.payload(), r#"{"@type":"type.googleapis.com/x"}"#);

        let empty: LogEntry = serde_json::from_value(json!({"insertId": "abc"})).unwrap();
        assert_eq!(empty.payload(), "");
    }

    #[tokio::test]
    async fn test_absent_client_returns_fallback() {
        let filter = build_filter(Platform::Orchestrated, "proj1", "myapp");
        for limit in [0, 1, 10, 1000] {
            let logs = fetch_logs(None, &filter, limit).await.unwrap();
            assert_eq!(logs, vec!["Check console for logs.".to_string()]);
        }
    }

    #[tokio::test]
    async fn test_single_page_in_service_order() {
        let mut server = Server::new_async().await;
        let filter = build_filter(Platform::ManagedApp, "proj1", "myapp");
        let page = mock_page(
            &mut server,
            &filter,
            10,
            None,
            text_entries("newest", 3),
            None,
            1,
        )
        .await;

        let client = client_for(&server);
        let logs = fetch_logs(Some(&client), &filter, 10).await.unwrap();

        page.assert_async().await;
        assert_eq!(logs, vec!["newest-0", "newest-1", "newest-2"]);
    }

    #[tokio::test]
    async fn test_limit_caps_oversized_page() {
        let mut server = Server::new_async().await;
        let filter = build_filter(Platform::Orchestrated, "proj1", "myapp");
        let page = mock_page(
            &mut server,
            &filter,
            2,
            None,
            text_entries("a", 5),
            Some("p2"),
            1,
        )
        .await;
        let next =
            mock_page(&mut server, &filter, 2, Some("p2"), text_entries("b", 5), None, 0).await;

        let client = client_for(&server);
        let logs = fetch_logs(Some(&client), &filter, 2).await.unwrap();

        page.assert_async().await;
        next.assert_async().await;
        assert_eq!(logs, vec!["a-0", "a-1"]);
    }

    #[tokio::test]
    async fn test_follows_pages_until_limit() {
        let mut server = Server::new_async().await;
        let filter = build_filter(Platform::Orchestrated, "proj1", "myapp");
        let first =
            mock_page(&mut server, &filter, 3, None, text_entries("a", 2), Some("p2"), 1).await;
        let second = mock_page(
            &mut server,
            &filter,
            3,
            Some("p2"),
            text_entries("b", 4),
            Some("p3"),
            1,
        )
        .await;
        let third =
            mock_page(&mut server, &filter, 3, Some("p3"), text_entries("c", 1), None, 0).await;

        let client = client_for(&server);
        let logs = fetch_logs(Some(&client), &filter, 3).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
        assert_eq!(logs, vec!["a-0", "a-1", "b-0"]);
    }

    #[tokio::test]
    async fn test_skips_empty_pages() {
        let mut server = Server::new_async().await;
        let filter = build_filter(Platform::ManagedApp, "proj1", "myapp");
        let first = mock_page(&mut server, &filter, 10, None, vec![], Some("p2"), 1).await;
        let second =
            mock_page(&mut server, &filter, 10, Some("p2"), text_entries("a", 1), None, 1).await;

        let client = client_for(&server);
        let logs = fetch_logs(Some(&client), &filter, 10).await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(logs, vec!["a-0"]);
    }

    #[tokio::test]
    async fn test_fewer_entries_than_limit() {
        let mut server = Server::new_async().await;
        let filter = build_filter(Platform::ManagedApp, "proj1", "myapp");
        let _page = mock_page(&mut server, &filter, 10, None, vec![], None, 1).await;

        let client = client_for(&server);
        let logs = fetch_logs(Some(&client), &filter, 10).await.unwrap();
        assert!(logs.is_empty());
    }

    #[tokio::test]
    async fn test_zero_limit_issues_no_request() {
        let mut server = Server::new_async().await;
        let filter = build_filter(Platform::ManagedApp, "proj1", "myapp");
        let page = server
            .mock("POST", ENTRIES_LIST_PATH)
            .expect(0)
            .create_async()
            .await;

        let client = client_for(&server);
        let logs = fetch_logs(Some(&client), &filter, 0).await.unwrap();

        page.assert_async().await;
        assert!(logs.is_empty());
    }

    #[tokio::test]
    async fn test_listing_error_propagates() {
        let mut server = Server::new_async().await;
        let filter = build_filter(Platform::ManagedApp, "proj1", "myapp");
        let _page = server
            .mock("POST", ENTRIES_LIST_PATH)
            .with_status(500)
            .with_body("backend unavailable")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = fetch_logs(Some(&client), &filter, 10).await.unwrap_err();
        assert!(matches!(err, FetchError::Rejected { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_error_on_later_page_propagates() {
        let mut server = Server::new_async().await;
        let filter = build_filter(Platform::ManagedApp, "proj1", "myapp");
        let _first =
            mock_page(&mut server, &filter, 5, None, text_entries("a", 2), Some("p2"), 1).await;
        let _second = server
            .mock("POST", ENTRIES_LIST_PATH)
            .match_body(Matcher::PartialJson(json!({"pageToken": "p2"})))
            .with_status(503)
            .create_async()
            .await;

        let client = client_for(&server);
        let err = fetch_logs(Some(&client), &filter, 5).await.unwrap_err();
        assert!(matches!(err, FetchError::Rejected { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_undecodable_response_propagates() {
        let mut server = Server::new_async().await;
        let filter = build_filter(Platform::ManagedApp, "proj1", "myapp");
        let _page = server
            .mock("POST", ENTRIES_LIST_PATH)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = client_for(&server);
        let err = fetch_logs(Some(&client), &filter, 10).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
