// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Validation and first-wins deduplication of pulled endpoints.

use crate::constants::{
    DROP_REASON_DUPLICATE, DROP_REASON_INVALID_RECORD, DROP_REASON_UNSUPPORTED_ALIAS, STAGE_DEDUP,
};
use crate::endpoint::Endpoint;
use crate::metrics::record_endpoint_dropped;
use crate::source::{EventHandler, Source};
use anyhow::Result;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Drops invalid endpoints and repeated occurrences of the same record.
///
/// Endpoints are processed in pull order:
///
/// 1. Endpoints failing [`Endpoint::check_endpoint`] are dropped.
/// 2. Endpoints flagged as alias on a type without alias support are dropped.
/// 3. Repeated targets are collapsed, keeping first occurrence order.
/// 4. An endpoint whose [`Endpoint::identity_key`] was already seen is dropped;
///    the first occurrence, with its metadata, is kept.
pub struct DedupSource {
    source: Box<dyn Source>,
}

impl DedupSource {
    pub fn new(source: Box<dyn Source>) -> Self {
        Self { source }
    }
}

#[async_trait::async_trait]
impl Source for DedupSource {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        let endpoints = self.source.endpoints().await?;

        let mut result = Vec::with_capacity(endpoints.len());
        let mut collected = HashSet::with_capacity(endpoints.len());

        for mut ep in endpoints {
            if !ep.check_endpoint() {
                warn!(
                    "Skipping endpoint [{}:{}] due to invalid configuration [{}:{}]",
                    ep.set_identifier,
                    ep.dns_name,
                    ep.record_type_str(),
                    ep.targets
                );
                record_endpoint_dropped(STAGE_DEDUP, DROP_REASON_INVALID_RECORD);
                continue;
            }

            if !ep.alias_supported() {
                warn!(
                    "Endpoint {} of type {} does not support alias records",
                    ep.dns_name,
                    ep.record_type_str()
                );
                record_endpoint_dropped(STAGE_DEDUP, DROP_REASON_UNSUPPORTED_ALIAS);
                continue;
            }

            if ep.targets.len() > 1 {
                ep.targets = ep.targets.deduplicated();
            }

            let identifier = ep.identity_key();
            if !collected.insert(identifier) {
                debug!("Removing duplicate endpoint {}", ep);
                record_endpoint_dropped(STAGE_DEDUP, DROP_REASON_DUPLICATE);
                continue;
            }

            result.push(ep);
        }

        Ok(result)
    }

    fn add_event_handler(&self, handler: EventHandler) {
        self.source.add_event_handler(handler);
    }
}

#[cfg(test)]
#[path = "dedup_source_tests.rs"]
mod dedup_source_tests;
