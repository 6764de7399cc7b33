// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Network-based admission of individual endpoint targets.
//!
//! A [`TargetNetFilter`] holds an allow-list and an exclusion list of CIDR
//! networks. A target is admitted when it lies inside an allowed network (or
//! no allow-list is configured) and outside every excluded network.

use ipnet::IpNet;
use std::net::IpAddr;
use tracing::error;

/// Decides which targets may be published.
pub trait TargetFilter: Send + Sync {
    /// Returns true if the filter has any rule to apply
    fn is_enabled(&self) -> bool;

    /// Returns true if the target is admitted
    fn matches(&self, target: &str) -> bool;
}

/// CIDR allow-list with optional exclusions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetNetFilter {
    filter_nets: Vec<IpNet>,
    exclude_nets: Vec<IpNet>,
}

impl TargetNetFilter {
    /// Filter admitting only targets inside `filter_nets`.
    pub fn new<S: AsRef<str>>(filter_nets: &[S]) -> Self {
        Self::with_exclusions(filter_nets, &[] as &[&str])
    }

    /// Filter with both an allow-list and an exclusion list.
    ///
    /// Entries that do not parse as CIDR networks are logged and ignored, so
    /// a list made only of invalid entries leaves that side of the filter empty.
    pub fn with_exclusions<S: AsRef<str>, E: AsRef<str>>(
        filter_nets: &[S],
        exclude_nets: &[E],
    ) -> Self {
        Self {
            filter_nets: prepare_target_filters(filter_nets),
            exclude_nets: prepare_target_filters(exclude_nets),
        }
    }

    #[must_use]
    pub fn filter_nets(&self) -> &[IpNet] {
        &self.filter_nets
    }

    #[must_use]
    pub fn exclude_nets(&self) -> &[IpNet] {
        &self.exclude_nets
    }
}

impl TargetFilter for TargetNetFilter {
    fn is_enabled(&self) -> bool {
        !self.filter_nets.is_empty() || !self.exclude_nets.is_empty()
    }

    fn matches(&self, target: &str) -> bool {
        match_filter(&self.filter_nets, target, true)
            && !match_filter(&self.exclude_nets, target, false)
    }
}

fn prepare_target_filters<S: AsRef<str>>(filters: &[S]) -> Vec<IpNet> {
    filters
        .iter()
        .filter_map(|filter| {
            let filter = filter.as_ref().trim();
            match filter.parse::<IpNet>() {
                Ok(net) => Some(net),
                Err(e) => {
                    error!("Invalid target net filter: {}: {}", filter, e);
                    None
                }
            }
        })
        .collect()
}

/// `empty_value` is returned when no networks are configured.
/// A target that is not an IP address is inside no network.
fn match_filter(filters: &[IpNet], target: &str, empty_value: bool) -> bool {
    if filters.is_empty() {
        return empty_value;
    }

    // IPv4-mapped IPv6 targets match IPv4 networks
    let Ok(ip) = target.parse::<IpAddr>().map(|ip| ip.to_canonical()) else {
        return false;
    };

    filters.iter().any(|net| net.contains(&ip))
}

#[cfg(test)]
#[path = "target_filter_tests.rs"]
mod target_filter_tests;
