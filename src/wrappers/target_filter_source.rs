// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Per-target admission of pulled endpoints.

use crate::constants::{DROP_REASON_NO_MATCHING_TARGETS, STAGE_TARGET_FILTER};
use crate::endpoint::{Endpoint, TargetFilter, Targets};
use crate::metrics::record_endpoint_dropped;
use crate::source::{EventHandler, Source};
use anyhow::Result;
use tracing::debug;

/// Keeps only the targets admitted by a [`TargetFilter`].
///
/// Endpoints left without any target are dropped. A disabled filter makes
/// the stage a pass-through that does not register for change events.
pub struct TargetFilterSource {
    source: Box<dyn Source>,
    target_filter: Box<dyn TargetFilter>,
}

impl TargetFilterSource {
    pub fn new(source: Box<dyn Source>, target_filter: Box<dyn TargetFilter>) -> Self {
        Self {
            source,
            target_filter,
        }
    }
}

#[async_trait::async_trait]
impl Source for TargetFilterSource {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        let endpoints = self.source.endpoints().await?;

        if !self.target_filter.is_enabled() {
            return Ok(endpoints);
        }

        let mut result = Vec::with_capacity(endpoints.len());

        for mut ep in endpoints {
            let filtered: Targets = ep
                .targets
                .iter()
                .filter(|target| self.target_filter.matches(target))
                .cloned()
                .collect();

            if filtered.is_empty() {
                debug!("Skipping endpoint {} because all targets were filtered out", ep);
                record_endpoint_dropped(STAGE_TARGET_FILTER, DROP_REASON_NO_MATCHING_TARGETS);
                continue;
            }

            ep.targets = filtered;
            result.push(ep);
        }

        Ok(result)
    }

    fn add_event_handler(&self, handler: EventHandler) {
        if self.target_filter.is_enabled() {
            self.source.add_event_handler(handler);
        }
    }
}

#[cfg(test)]
#[path = "target_filter_source_tests.rs"]
mod target_filter_source_tests;
