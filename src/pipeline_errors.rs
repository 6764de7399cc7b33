// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Error types for the endpoint composition pipeline.
//!
//! This module provides specialized error types for:
//! - NAT64 prefix configuration and address synthesis
//! - Loading pipeline configuration and endpoint manifests from disk
//!
//! Upstream source failures are not wrapped here: they travel through the
//! pipeline as `anyhow::Error` so callers see the original error unchanged.

use thiserror::Error;

/// Errors raised while building or running the NAT64 synthesis stage.
///
/// Prefix errors are raised at construction time and prevent the pipeline
/// from being assembled. Target errors abort the pull in which they occur.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Nat64Error {
    /// Prefix string does not parse as a network
    #[error("Invalid NAT64 prefix '{prefix}': {reason}")]
    InvalidPrefix {
        /// The configured prefix string
        prefix: String,
        /// Parser error message
        reason: String,
    },

    /// Prefix parses but is an IPv4 network
    #[error("NAT64 prefix '{prefix}' is not an IPv6 network")]
    NotIpv6 {
        /// The configured prefix string
        prefix: String,
    },

    /// Prefix is IPv6 but not a /96
    #[error("NAT64 prefix '{prefix}' must have a prefix length of 96, got /{prefix_len}")]
    InvalidPrefixLength {
        /// The configured prefix string
        prefix: String,
        /// The prefix length that was supplied
        prefix_len: u8,
    },

    /// AAAA target is not an IPv6 address
    ///
    /// Aborts the whole pull, not just the offending endpoint.
    #[error("Target '{target}' of AAAA endpoint {dns_name} is not a valid IPv6 address: {reason}")]
    InvalidTarget {
        /// DNS name of the endpoint carrying the target
        dns_name: String,
        /// The raw target string
        target: String,
        /// Parser error message
        reason: String,
    },

    /// Trailing 32 bits of a NAT64 address could not be read as IPv4
    #[error("could not parse {octets:?} to IPv4 address")]
    EmbeddedAddress {
        /// The trailing octets taken from the IPv6 address
        octets: Vec<u8>,
    },
}

/// Errors raised while loading configuration or endpoint manifests from disk.
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read '{path}': {reason}")]
    ReadFailed {
        /// Path of the file
        path: String,
        /// I/O error message
        reason: String,
    },

    /// File was read but its contents are not valid
    #[error("Failed to parse '{path}': {reason}")]
    ParseFailed {
        /// Path of the file
        path: String,
        /// Deserializer error message
        reason: String,
    },
}

impl Nat64Error {
    /// Returns true if this error comes from the NAT64 prefix configuration
    /// rather than from the endpoints of a pull.
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPrefix { .. } | Self::NotIpv6 { .. } | Self::InvalidPrefixLength { .. }
        )
    }
}

#[cfg(test)]
#[path = "pipeline_errors_tests.rs"]
mod pipeline_errors_tests;
