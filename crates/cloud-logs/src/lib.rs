// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Fetch and link to an application's own Cloud Logging entries.
//!
//! The flow is always the same: detect the hosting [`Platform`], build the
//! platform's [`LogFilter`], then either read the most recent entries through a
//! [`LoggingClient`] or hand the user a console deep link.
//!
//! ```rust,ignore
//! use cloud_logs::{build_console_link, build_filter, fetch_logs, ClientFactory, Config, Platform};
//!
//! let config = Config::from_env()?;
//! let platform = Platform::detect();
//! let filter = build_filter(platform, &config.project_id, &config.project_name);
//! let client = ClientFactory::new(&config).create_client(platform).await.ok();
//! let payloads = fetch_logs(client.as_ref(), &filter, config.limit).await?;
//! let link = build_console_link(&config.project_id, &filter);
//! ```

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fetcher;
pub mod filter;
pub mod http;
pub mod link;
pub mod platform;
pub mod view;

pub use client::{ClientFactory, LoggingClient};
pub use config::Config;
pub use error::{ConfigError, CredentialError, FetchError};
pub use fetcher::{fetch_logs, LogEntry, DEFAULT_LIMIT, FALLBACK_MESSAGE};
pub use filter::{build_filter, FilterClause, LogFilter};
pub use link::build_console_link;
pub use platform::Platform;
pub use view::{load_logs_view, LogsView};
