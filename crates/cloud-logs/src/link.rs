// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use url::form_urlencoded;

use crate::filter::{LogFilter, AND_SEPARATOR};

/// Logs viewer page of the Cloud Console.
pub const CONSOLE_LOGS_URL: &str = "https://console.cloud.google.com/logs/viewer";

/// Builds a Cloud Console link that opens the logs viewer on `filter`.
///
/// The viewer's advanced filter box takes one clause per line, so every `AND`
/// separator is replaced by a newline before encoding.
pub fn build_console_link(project_id: &str, filter: &LogFilter) -> String {
    let advanced_filter = filter.as_str().replace(AND_SEPARATOR, "\n");
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("project", project_id)
        .append_pair("advancedFilter", &advanced_filter)
        .finish();
    format!("{CONSOLE_LOGS_URL}?{query}")
}
