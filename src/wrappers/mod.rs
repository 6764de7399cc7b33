// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Pipeline stages and their assembly.
//!
//! Every stage wraps another [`Source`] and is itself a `Source`. The stages
//! are always chained in the same order:
//!
//! ```text
//! PostProcessor
//!   └─ TargetFilterSource   (only when a target filter is enabled)
//!        └─ Nat64Source     (only when NAT64 networks are configured)
//!             └─ DedupSource
//!                  └─ MultiSource
//!                       └─ discovery sources...
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use endpoint_composer::source::Source;
//! use endpoint_composer::sources::StaticSource;
//! use endpoint_composer::wrappers::{wrap_sources, WrapperConfig};
//! use std::time::Duration;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = WrapperConfig::default()
//!     .with_nat64_networks(["64:ff9b::/96"])
//!     .with_min_ttl(Duration::from_secs(60));
//!
//! let pipeline = wrap_sources(vec![Box::new(StaticSource::new(Vec::new()))], &config)?;
//! let endpoints = pipeline.endpoints().await?;
//! # Ok(())
//! # }
//! ```

pub mod dedup_source;
pub mod multi_source;
pub mod nat64_source;
pub mod post_processor;
pub mod target_filter_source;

pub use dedup_source::DedupSource;
pub use multi_source::MultiSource;
pub use nat64_source::Nat64Source;
pub use post_processor::{PostProcessor, PostProcessorConfig};
pub use target_filter_source::TargetFilterSource;

use crate::constants::{STAGE_NAT64, STAGE_TARGET_FILTER};
use crate::endpoint::{Endpoint, TargetFilter, TargetNetFilter, Targets};
use crate::metrics::{record_pull_error, record_pull_success, record_stage_enabled};
use crate::source::{EventHandler, Source};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Settings for assembling a pipeline.
///
/// Deserializes from camelCase YAML or JSON; `minTtl` is given in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WrapperConfig {
    /// Targets used for endpoints that come without any
    pub default_targets: Vec<String>,
    /// Use the default targets even when a source provides its own
    pub force_default_targets: bool,
    /// NAT64 /96 prefixes for A record synthesis
    pub nat64_networks: Vec<String>,
    /// CIDRs a target must lie in to be published
    pub target_net_filter: Vec<String>,
    /// CIDRs excluded from publication
    pub exclude_target_nets: Vec<String>,
    /// TTL floor applied to every endpoint
    #[serde(deserialize_with = "deserialize_seconds")]
    pub min_ttl: Duration,
    /// Mark CNAME endpoints as alias records
    pub prefer_alias: bool,
}

fn deserialize_seconds<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

fn to_strings<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl WrapperConfig {
    /// Targets for endpoints whose source provides none
    #[must_use]
    pub fn with_default_targets<I, S>(mut self, default_targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_targets = to_strings(default_targets);
        self
    }

    /// Replace source-provided targets with the default targets
    #[must_use]
    pub fn with_force_default_targets(mut self, force_default_targets: bool) -> Self {
        self.force_default_targets = force_default_targets;
        self
    }

    /// NAT64 /96 prefixes; enables the NAT64 stage when non-empty
    #[must_use]
    pub fn with_nat64_networks<I, S>(mut self, nat64_networks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nat64_networks = to_strings(nat64_networks);
        self
    }

    /// CIDRs a target must lie in; enables the target filter stage
    #[must_use]
    pub fn with_target_net_filter<I, S>(mut self, target_net_filter: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_net_filter = to_strings(target_net_filter);
        self
    }

    /// CIDRs excluded from publication; enables the target filter stage
    #[must_use]
    pub fn with_exclude_target_nets<I, S>(mut self, exclude_target_nets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_target_nets = to_strings(exclude_target_nets);
        self
    }

    /// TTL floor in whole seconds; zero disables it
    #[must_use]
    pub fn with_min_ttl(mut self, min_ttl: Duration) -> Self {
        self.min_ttl = min_ttl;
        self
    }

    /// Mark CNAME endpoints with `alias=true`
    #[must_use]
    pub fn with_prefer_alias(mut self, prefer_alias: bool) -> Self {
        self.prefer_alias = prefer_alias;
        self
    }
}

/// An assembled chain of stages.
///
/// Pulling from a `Pipeline` pulls once through every stage. Event handlers
/// are registered with the stage directly beneath the [`PostProcessor`], so
/// each stage's own forwarding rules decide which sources receive them.
pub struct Pipeline {
    head: PostProcessor,
    stages: Vec<&'static str>,
}

impl Pipeline {
    /// Optional stages included in this pipeline, in chain order
    #[must_use]
    pub fn stages(&self) -> &[&'static str] {
        &self.stages
    }
}

#[async_trait::async_trait]
impl Source for Pipeline {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        let start = Instant::now();

        match self.head.endpoints().await {
            Ok(endpoints) => {
                record_pull_success(start.elapsed());
                debug!("Pipeline produced {} endpoints", endpoints.len());
                Ok(endpoints)
            }
            Err(e) => {
                record_pull_error(start.elapsed());
                Err(e)
            }
        }
    }

    fn add_event_handler(&self, handler: EventHandler) {
        self.head.source().add_event_handler(handler);
    }
}

/// Assemble the pipeline over a set of discovery sources.
///
/// # Errors
///
/// Returns an error if a configured NAT64 network is not a valid /96 IPv6 prefix.
pub fn wrap_sources(sources: Vec<Box<dyn Source>>, config: &WrapperConfig) -> Result<Pipeline> {
    let mut stages = Vec::new();

    let multi_source = MultiSource::new(
        sources,
        Targets::new(config.default_targets.iter().cloned()),
        config.force_default_targets,
    );
    let mut combined: Box<dyn Source> = Box::new(DedupSource::new(Box::new(multi_source)));

    if !config.nat64_networks.is_empty() {
        let nat64 = Nat64Source::new(combined, &config.nat64_networks)
            .context("failed to create NAT64 source")?;
        combined = Box::new(nat64);
        stages.push(STAGE_NAT64);
    }

    let target_filter =
        TargetNetFilter::with_exclusions(&config.target_net_filter, &config.exclude_target_nets);
    if target_filter.is_enabled() {
        combined = Box::new(TargetFilterSource::new(combined, Box::new(target_filter)));
        stages.push(STAGE_TARGET_FILTER);
    }

    let post_processor_config = PostProcessorConfig::default()
        .with_ttl(config.min_ttl)
        .with_prefer_alias(config.prefer_alias);
    let head = PostProcessor::new(combined, post_processor_config);

    for stage in &stages {
        record_stage_enabled(stage);
    }
    info!("Created source wrappers: {:?}", stages);

    Ok(Pipeline { head, stages })
}
