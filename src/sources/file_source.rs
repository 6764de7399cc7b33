// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Endpoints loaded from a YAML manifest.
//!
//! The manifest holds a single `endpoints` list using the same field names
//! as the pipeline output:
//!
//! ```yaml
//! endpoints:
//!   - dnsName: www.example.org
//!     recordType: A
//!     targets: [192.0.2.10]
//!     recordTTL: 300
//! ```

use crate::endpoint::Endpoint;
use crate::pipeline_errors::ConfigError;
use crate::source::{EventHandler, Source};
use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk layout of an endpoint manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointManifest {
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// Source re-reading a manifest file on every pull.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read and deserialize a YAML file.
///
/// # Errors
///
/// Returns [`ConfigError::ReadFailed`] if the file cannot be read and
/// [`ConfigError::ParseFailed`] if its contents do not deserialize into `T`.
pub async fn load_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    serde_yaml::from_str(&contents).map_err(|e| ConfigError::ParseFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[async_trait::async_trait]
impl Source for FileSource {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        let manifest: EndpointManifest = load_yaml(&self.path).await?;
        debug!(
            "Loaded {} endpoints from {}",
            manifest.endpoints.len(),
            self.path.display()
        );
        Ok(manifest.endpoints)
    }

    fn add_event_handler(&self, _handler: EventHandler) {
        debug!(
            "File source {} does not watch for changes, ignoring event handler",
            self.path.display()
        );
    }
}

#[cfg(test)]
#[path = "file_source_tests.rs"]
mod file_source_tests;
