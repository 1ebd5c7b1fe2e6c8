// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Cloud Logging filter expressions for the app's own log streams.
//!
//! A filter is a sequence of clauses joined with `AND`. Clause order carries no
//! meaning for the logging backend but is kept fixed so the rendered filter is
//! deterministic.
//!
//! Identifiers are interpolated as-is. Project ids and names come from the
//! project generator, which already restricts them to resource-name characters.

use std::fmt;

use crate::platform::Platform;

/// Separator placed between clauses.
pub const AND_SEPARATOR: &str = " AND ";
/// Namespace the generated deployment runs in.
pub const CLUSTER_NAMESPACE: &str = "default";
/// Zone the generated cluster is created in.
pub const CLUSTER_ZONE: &str = "us-west1-a";

/// A single resource or label predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterClause(String);

impl FilterClause {
    pub fn new(clause: impl Into<String>) -> Self {
        Self(clause.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The `AND`-joined filter string sent to the logging API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter(String);

impl LogFilter {
    pub fn from_clauses(clauses: &[FilterClause]) -> Self {
        let joined = clauses
            .iter()
            .map(FilterClause::as_str)
            .collect::<Vec<&str>>()
            .join(AND_SEPARATOR);
        Self(joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the filter back into its clauses.
    pub fn clauses(&self) -> impl Iterator<Item = &str> {
        self.0.split(AND_SEPARATOR)
    }
}

impl fmt::Display for LogFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Returns the clauses selecting the app's logs on `platform`, in rendering order.
pub fn filter_clauses(
    platform: Platform,
    project_id: &str,
    project_name: &str,
) -> Vec<FilterClause> {
    match platform {
        Platform::ManagedApp => vec![
            FilterClause::new(r#"resource.type="gae_app""#),
            FilterClause::new(format!(
                r#"logName="projects/{project_id}/logs/stdout" OR "projects/{project_id}/logs/stderr""#
            )),
        ],
        Platform::Orchestrated => vec![
            FilterClause::new(r#"resource.type="container""#),
            FilterClause::new(format!(r#"resource.labels.cluster_name="{project_name}""#)),
            FilterClause::new(format!(r#"resource.labels.namespace_id="{CLUSTER_NAMESPACE}""#)),
            FilterClause::new(format!(r#"resource.labels.project_id="{project_id}""#)),
            FilterClause::new(format!(r#"resource.labels.zone:"{CLUSTER_ZONE}""#)),
            FilterClause::new(format!(r#"resource.labels.container_name="{project_name}-app""#)),
        ],
    }
}

/// Builds the filter selecting the app's logs on `platform`.
pub fn build_filter(platform: Platform, project_id: &str, project_name: &str) -> LogFilter {
    LogFilter::from_clauses(&filter_clauses(platform, project_id, project_name))
}
