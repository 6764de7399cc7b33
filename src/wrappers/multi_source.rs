// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Merge the output of several discovery sources into one list.
//!
//! When default targets are configured, endpoints that arrive without
//! targets (or every endpoint, when forced) are rebuilt from the defaults,
//! one endpoint per record type suitable for the default targets.

use crate::constants::STAGE_MULTI_SOURCE;
use crate::endpoint::{endpoints_for_hostname, Endpoint, Targets};
use crate::metrics::record_endpoints_synthesized;
use crate::source::{EventHandler, Source};
use anyhow::Result;
use tracing::warn;

/// Concatenates the endpoints of its children, in child order.
pub struct MultiSource {
    children: Vec<Box<dyn Source>>,
    default_targets: Targets,
    force_default_targets: bool,
}

impl MultiSource {
    pub fn new(
        children: Vec<Box<dyn Source>>,
        default_targets: Targets,
        force_default_targets: bool,
    ) -> Self {
        Self {
            children,
            default_targets,
            force_default_targets,
        }
    }

    /// Rebuild an endpoint from the default targets.
    ///
    /// The original endpoint's labels are copied onto every replacement.
    fn apply_default_targets(&self, ep: &Endpoint) -> Vec<Endpoint> {
        let mut replacements = endpoints_for_hostname(
            &ep.dns_name,
            &self.default_targets,
            ep.record_ttl,
            &ep.provider_specific,
            &ep.set_identifier,
        );
        for replacement in &mut replacements {
            replacement.labels.clone_from(&ep.labels);
        }
        replacements
    }
}

#[async_trait::async_trait]
impl Source for MultiSource {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        let mut result = Vec::new();
        let has_default_targets = !self.default_targets.is_empty();
        let mut synthesized = 0;

        for child in &self.children {
            let endpoints = child.endpoints().await?;

            if !has_default_targets {
                result.extend(endpoints);
                continue;
            }

            for ep in endpoints {
                let has_source_targets = !ep.targets.is_empty();

                if has_source_targets && !self.force_default_targets {
                    warn!(
                        "Source provided targets for {} ({}), ignoring default targets [{}]; enable force_default_targets to override",
                        ep.dns_name,
                        ep.record_type_str(),
                        self.default_targets
                    );
                    result.push(ep);
                    continue;
                }

                if has_source_targets {
                    warn!(
                        "Forcing default targets [{}] for {} ({}), overriding source targets [{}]",
                        self.default_targets,
                        ep.dns_name,
                        ep.record_type_str(),
                        ep.targets
                    );
                }

                let replacements = self.apply_default_targets(&ep);
                synthesized += replacements.len();
                result.extend(replacements);
            }
        }

        record_endpoints_synthesized(STAGE_MULTI_SOURCE, synthesized);
        Ok(result)
    }

    fn add_event_handler(&self, handler: EventHandler) {
        for child in &self.children {
            child.add_event_handler(handler.clone());
        }
    }
}

#[cfg(test)]
#[path = "multi_source_tests.rs"]
mod multi_source_tests;
