// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::fmt;

/// Set by App Engine on every instance. Its value is irrelevant, only presence matters.
pub const MANAGED_APP_MARKER: &str = "GAE_APPLICATION";

/// Hosting platform the application is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// App Engine, where the runtime provides an ambient service account identity.
    ManagedApp,
    /// Kubernetes Engine, where credentials are mounted as a secret file.
    Orchestrated,
}

impl Platform {
    /// Detects the platform from the process environment.
    ///
    /// This is the only place the environment is consulted. Everything downstream
    /// takes the returned value as a parameter.
    pub fn detect() -> Self {
        Self::detect_with(|name| env::var_os(name).is_some())
    }

    /// Detects the platform using the given environment presence check.
    pub fn detect_with<F>(is_set: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        if is_set(MANAGED_APP_MARKER) {
            Platform::ManagedApp
        } else {
            Platform::Orchestrated
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::ManagedApp => write!(f, "app engine"),
            Platform::Orchestrated => write!(f, "kubernetes engine"),
        }
    }
}
