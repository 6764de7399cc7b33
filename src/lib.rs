// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! # Endpoint Composer - DNS endpoint composition pipeline
//!
//! Endpoint Composer takes the raw output of several discovery sources (DNS
//! name to target bindings, possibly inconsistent and duplicated) and turns it
//! into a single, validated, deduplicated set of endpoints ready to be diffed
//! against a DNS backend.
//!
//! ## Overview
//!
//! Every pipeline stage wraps another [`source::Source`], so stages chain
//! into one composite source. A pull flows through, in order:
//!
//! - **Merge** - concatenation of all discovery sources, with default targets
//! - **Validation and deduplication** - malformed MX/SRV/NAPTR records and
//!   unsupported aliases are dropped, then the first occurrence of each record wins
//! - **NAT64 synthesis** - A records derived from NAT64-mapped AAAA targets
//! - **Target filtering** - CIDR-based admission and exclusion of targets
//! - **Post-processing** - minimum TTL and alias preference
//!
//! ## Modules
//!
//! - [`endpoint`] - Endpoint data model, record validation and target filters
//! - [`source`] - The `Source` trait implemented by sources and stages
//! - [`sources`] - Static and file-backed discovery sources
//! - [`wrappers`] - Pipeline stages and their assembly
//! - [`metrics`] - Prometheus metrics
//! - [`pipeline_errors`] - Typed errors
//!
//! ## Example
//!
//! ```rust,no_run
//! use endpoint_composer::endpoint::{Endpoint, RecordType};
//! use endpoint_composer::source::Source;
//! use endpoint_composer::sources::StaticSource;
//! use endpoint_composer::wrappers::{wrap_sources, WrapperConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let source = StaticSource::new(vec![
//!     Endpoint::new("www.example.org", RecordType::A, ["192.0.2.10", "192.0.2.10"]),
//!     Endpoint::new("www.example.org", RecordType::A, ["192.0.2.10"]),
//! ]);
//!
//! let pipeline = wrap_sources(vec![Box::new(source)], &WrapperConfig::default())?;
//! let endpoints = pipeline.endpoints().await?;
//! assert_eq!(endpoints.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod constants;
pub mod endpoint;
pub mod metrics;
pub mod pipeline_errors;
pub mod source;
pub mod sources;
pub mod wrappers;

#[cfg(test)]
mod testutil;
