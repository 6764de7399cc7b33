// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the endpoint composition pipeline.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Provider-Specific Property Constants
// ============================================================================

/// Provider-specific property name marking an endpoint as an alias record
pub const PROVIDER_SPECIFIC_ALIAS: &str = "alias";

/// Value of the alias property that enables alias handling
pub const PROVIDER_SPECIFIC_ALIAS_TRUE: &str = "true";

// ============================================================================
// Record Validation Constants
// ============================================================================

/// Minimum whitespace-separated fields in an MX target (preference, exchange)
pub const MX_MIN_FIELDS: usize = 2;

/// Minimum whitespace-separated fields in an SRV target (priority, weight, port, target)
pub const SRV_MIN_FIELDS: usize = 4;

/// Minimum whitespace-separated fields in a NAPTR target
/// (order, preference, flags, service, regexp, replacement)
pub const NAPTR_MIN_FIELDS: usize = 6;

// ============================================================================
// NAT64 Constants
// ============================================================================

/// Required prefix length of a NAT64 network (RFC 6052 /96 prefixes)
pub const NAT64_PREFIX_LEN: u8 = 96;

// ============================================================================
// Endpoint Formatting Constants
// ============================================================================

/// Separator used when rendering a target list as a single string
pub const TARGET_SEPARATOR: &str = ";";

/// Separator between components of an endpoint identity key
pub const IDENTITY_KEY_SEPARATOR: &str = "/";

// ============================================================================
// Stage Names
// ============================================================================

/// Stage name for the multi-source merge stage
pub const STAGE_MULTI_SOURCE: &str = "multi_source";

/// Stage name for the deduplication stage
pub const STAGE_DEDUP: &str = "dedup";

/// Stage name for the NAT64 synthesis stage
pub const STAGE_NAT64: &str = "nat64";

/// Stage name for the target filter stage
pub const STAGE_TARGET_FILTER: &str = "target_filter";

// ============================================================================
// Drop Reasons
// ============================================================================

/// Endpoint rejected by structural record validation
pub const DROP_REASON_INVALID_RECORD: &str = "invalid_record";

/// Endpoint flagged as alias on a record type without alias support
pub const DROP_REASON_UNSUPPORTED_ALIAS: &str = "unsupported_alias";

/// Endpoint identical to one already seen in the same pull
pub const DROP_REASON_DUPLICATE: &str = "duplicate";

/// Endpoint whose targets were all rejected by the target filter
pub const DROP_REASON_NO_MATCHING_TARGETS: &str = "no_matching_targets";

// ============================================================================
// Logging Constants
// ============================================================================

/// Default log filter when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable selecting the log output format (`text` or `json`)
pub const LOG_FORMAT_ENV: &str = "RUST_LOG_FORMAT";
