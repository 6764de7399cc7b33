// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Synthesis of IPv4 records from NAT64-mapped IPv6 targets.
//!
//! A NAT64 address embeds an IPv4 address in the trailing 32 bits of a /96
//! prefix (RFC 6052). For every AAAA endpoint with targets inside a
//! configured prefix, an A endpoint holding the embedded addresses is added
//! to the pull, right after its AAAA parent.

use crate::constants::{NAT64_PREFIX_LEN, STAGE_NAT64};
use crate::endpoint::{Endpoint, RecordType, Targets};
use crate::metrics::record_endpoints_synthesized;
use crate::pipeline_errors::Nat64Error;
use crate::source::{EventHandler, Source};
use anyhow::Result;
use ipnet::{IpNet, Ipv6Net};
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::debug;

/// Adds A endpoints for AAAA targets inside NAT64 prefixes.
pub struct Nat64Source {
    source: Box<dyn Source>,
    nat64_prefixes: Vec<Ipv6Net>,
}

impl Nat64Source {
    /// Wrap a source with the given NAT64 prefixes.
    ///
    /// An empty prefix list yields a stage that passes endpoints through.
    ///
    /// # Errors
    ///
    /// Returns a [`Nat64Error`] if any prefix is not an IPv6 network with a
    /// prefix length of exactly 96.
    pub fn new<S: AsRef<str>>(source: Box<dyn Source>, prefixes: &[S]) -> Result<Self, Nat64Error> {
        let nat64_prefixes = prefixes
            .iter()
            .map(|prefix| parse_nat64_prefix(prefix.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            source,
            nat64_prefixes,
        })
    }

    #[must_use]
    pub fn prefixes(&self) -> &[Ipv6Net] {
        &self.nat64_prefixes
    }

    /// Build the A endpoint for an AAAA endpoint, if any of its targets is NAT64-mapped.
    fn synthesize_a_endpoint(&self, ep: &Endpoint) -> Result<Option<Endpoint>, Nat64Error> {
        let mut v4_targets = Targets::default();

        for target in &ep.targets {
            let ip = target
                .parse::<Ipv6Addr>()
                .map_err(|e| Nat64Error::InvalidTarget {
                    dns_name: ep.dns_name.clone(),
                    target: target.clone(),
                    reason: e.to_string(),
                })?;

            if !self.nat64_prefixes.iter().any(|prefix| prefix.contains(&ip)) {
                continue;
            }

            let v4 = embedded_ipv4(&ip)?;
            debug!(
                "Synthesizing A target {} for {} from NAT64 address {}",
                v4, ep.dns_name, ip
            );
            v4_targets.push(v4.to_string());
        }

        if v4_targets.is_empty() {
            return Ok(None);
        }

        let mut v4_ep = ep.clone();
        v4_ep.record_type = Some(RecordType::A);
        v4_ep.targets = v4_targets;
        Ok(Some(v4_ep))
    }
}

fn parse_nat64_prefix(prefix: &str) -> Result<Ipv6Net, Nat64Error> {
    let net = prefix
        .trim()
        .parse::<IpNet>()
        .map_err(|e| Nat64Error::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: e.to_string(),
        })?;

    let IpNet::V6(net) = net else {
        return Err(Nat64Error::NotIpv6 {
            prefix: prefix.to_string(),
        });
    };

    if net.prefix_len() != NAT64_PREFIX_LEN {
        return Err(Nat64Error::InvalidPrefixLength {
            prefix: prefix.to_string(),
            prefix_len: net.prefix_len(),
        });
    }

    Ok(net.trunc())
}

/// IPv4 address held in the trailing 32 bits of a NAT64 address
fn embedded_ipv4(ip: &Ipv6Addr) -> Result<Ipv4Addr, Nat64Error> {
    let octets = ip.octets();
    let trailing = &octets[octets.len() - 4..];
    <[u8; 4]>::try_from(trailing)
        .map(Ipv4Addr::from)
        .map_err(|_| Nat64Error::EmbeddedAddress {
            octets: trailing.to_vec(),
        })
}

#[async_trait::async_trait]
impl Source for Nat64Source {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        let endpoints = self.source.endpoints().await?;

        let mut result = Vec::with_capacity(endpoints.len());
        let mut synthesized = 0;

        for ep in endpoints {
            if ep.record_type != Some(RecordType::Aaaa) || self.nat64_prefixes.is_empty() {
                result.push(ep);
                continue;
            }

            let v4_ep = self.synthesize_a_endpoint(&ep)?;
            result.push(ep);
            if let Some(v4_ep) = v4_ep {
                synthesized += 1;
                result.push(v4_ep);
            }
        }

        record_endpoints_synthesized(STAGE_NAT64, synthesized);
        Ok(result)
    }

    fn add_event_handler(&self, handler: EventHandler) {
        self.source.add_event_handler(handler);
    }
}

#[cfg(test)]
#[path = "nat64_source_tests.rs"]
mod nat64_source_tests;
