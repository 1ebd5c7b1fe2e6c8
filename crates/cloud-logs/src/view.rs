// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use tracing::{debug, info, warn};

use crate::client::ClientFactory;
use crate::config::Config;
use crate::error::FetchError;
use crate::fetcher::fetch_logs;
use crate::filter::build_filter;
use crate::link::build_console_link;
use crate::platform::Platform;

/// Recent log lines of the app together with a link to the full console view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogsView {
    pub platform: Platform,
    pub entries: Vec<String>,
    pub console_link: String,
}

/// Loads the app's most recent log lines and console link.
///
/// A client that cannot be created is not an error here: the view degrades to
/// the console fallback line. Listing failures are returned to the caller.
pub async fn load_logs_view(config: &Config, platform: Platform) -> Result<LogsView, FetchError> {
    let filter = build_filter(platform, &config.project_id, &config.project_name);
    debug!(
        "Built {} clause filter for {platform}: {filter}",
        filter.clauses().count()
    );
    let console_link = build_console_link(&config.project_id, &filter);

    let client = match ClientFactory::new(config).create_client(platform).await {
        Ok(client) => Some(client),
        Err(e) => {
            warn!("Unable to create logging client on {platform}: {e}");
            None
        }
    };

    let entries = fetch_logs(client.as_ref(), &filter, config.limit).await?;
    info!(
        "Loaded {} log lines for project {}",
        entries.len(),
        config.project_id
    );

    Ok(LogsView {
        platform,
        entries,
        console_link,
    })
}
