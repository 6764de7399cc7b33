// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Final policy pass over the pipeline output.
//!
//! Two independent policies are applied here:
//!
//! - **Minimum TTL**: endpoints below the floor (including unset TTLs) are
//!   raised to exactly the floor.
//! - **Prefer alias**: CNAME endpoints are marked with `alias=true` so
//!   backends that support it publish them as alias records.

use crate::constants::{PROVIDER_SPECIFIC_ALIAS, PROVIDER_SPECIFIC_ALIAS_TRUE};
use crate::endpoint::{Endpoint, RecordType, Ttl};
use crate::source::{EventHandler, Source};
use anyhow::Result;
use std::time::Duration;
use tracing::debug;

/// Policies applied by the [`PostProcessor`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostProcessorConfig {
    ttl: Ttl,
    is_configured: bool,
    prefer_alias: bool,
}

impl PostProcessorConfig {
    /// Set the minimum TTL. Sub-second precision is truncated; a floor of
    /// zero seconds leaves TTLs untouched.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        let secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        if secs > 0 {
            self.ttl = Ttl(secs);
            self.is_configured = true;
        }
        self
    }

    #[must_use]
    pub fn with_prefer_alias(mut self, prefer_alias: bool) -> Self {
        self.prefer_alias = prefer_alias;
        self
    }

    #[must_use]
    pub fn ttl(&self) -> Ttl {
        self.ttl
    }

    /// Returns true if a minimum TTL is active
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.is_configured
    }

    #[must_use]
    pub fn prefer_alias(&self) -> bool {
        self.prefer_alias
    }

    fn is_noop(&self) -> bool {
        !self.is_configured && !self.prefer_alias
    }
}

/// Applies [`PostProcessorConfig`] policies to every pulled endpoint.
///
/// Change notifications are not forwarded by this stage; register with the
/// wrapped source directly (see [`PostProcessor::source`]).
pub struct PostProcessor {
    source: Box<dyn Source>,
    config: PostProcessorConfig,
}

impl PostProcessor {
    pub fn new(source: Box<dyn Source>, config: PostProcessorConfig) -> Self {
        Self { source, config }
    }

    /// The wrapped source
    #[must_use]
    pub fn source(&self) -> &dyn Source {
        self.source.as_ref()
    }

    fn process(&self, ep: &mut Endpoint) {
        if self.config.is_configured && ep.record_ttl < self.config.ttl {
            debug!(
                "Raising TTL of {} from {} to {}",
                ep.dns_name, ep.record_ttl, self.config.ttl
            );
            ep.record_ttl = self.config.ttl;
        }

        if self.config.prefer_alias && ep.record_type == Some(RecordType::Cname) {
            ep.set_provider_specific_property(PROVIDER_SPECIFIC_ALIAS, PROVIDER_SPECIFIC_ALIAS_TRUE);
        }
    }
}

#[async_trait::async_trait]
impl Source for PostProcessor {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        let mut endpoints = self.source.endpoints().await?;

        if self.config.is_noop() {
            return Ok(endpoints);
        }

        for ep in &mut endpoints {
            self.process(ep);
        }

        Ok(endpoints)
    }

    fn add_event_handler(&self, _handler: EventHandler) {}
}

#[cfg(test)]
#[path = "post_processor_tests.rs"]
mod post_processor_tests;
