// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Structural validation of record-type-specific target syntax.
//!
//! Only the multi-field record types are checked: each target of an MX, SRV
//! or NAPTR endpoint must split into a minimum number of whitespace-separated
//! fields. Everything else (A, AAAA, TXT, CNAME, ...) is accepted as-is; the
//! pipeline does not second-guess plain addresses or free text.

use super::{Endpoint, RecordType};
use crate::constants::{
    MX_MIN_FIELDS, NAPTR_MIN_FIELDS, PROVIDER_SPECIFIC_ALIAS, PROVIDER_SPECIFIC_ALIAS_TRUE,
    SRV_MIN_FIELDS,
};
use tracing::debug;

impl RecordType {
    /// Minimum number of whitespace-separated fields a target of this type must have.
    ///
    /// Returns `None` for types whose targets are not structurally validated.
    #[must_use]
    pub fn min_target_fields(&self) -> Option<usize> {
        match self {
            Self::Mx => Some(MX_MIN_FIELDS),
            Self::Srv => Some(SRV_MIN_FIELDS),
            Self::Naptr => Some(NAPTR_MIN_FIELDS),
            _ => None,
        }
    }

    /// Returns true if records of this type may be published as provider aliases.
    #[must_use]
    pub fn supports_alias(&self) -> bool {
        matches!(self, Self::A | Self::Aaaa | Self::Cname)
    }
}

impl Endpoint {
    /// Check that every target is well-formed for the endpoint's record type.
    ///
    /// # Returns
    ///
    /// `false` if the endpoint is MX, SRV or NAPTR and any of its targets has
    /// fewer fields than the type requires, `true` otherwise.
    #[must_use]
    pub fn check_endpoint(&self) -> bool {
        let Some(min_fields) = self
            .record_type
            .as_ref()
            .and_then(RecordType::min_target_fields)
        else {
            return true;
        };

        self.targets.iter().all(|target| {
            let fields = target.split_whitespace().count();
            if fields < min_fields {
                debug!(
                    "Invalid {} record target: {}. Expected at least {} fields, got {}",
                    self.record_type_str(),
                    target,
                    min_fields,
                    fields
                );
                return false;
            }
            true
        })
    }

    /// Returns true if the endpoint asks to be published as an alias record.
    #[must_use]
    pub fn is_alias(&self) -> bool {
        self.provider_specific_property(PROVIDER_SPECIFIC_ALIAS)
            .is_some_and(|value| value == PROVIDER_SPECIFIC_ALIAS_TRUE)
    }

    /// Returns false if the endpoint is flagged as alias but its type cannot be one.
    #[must_use]
    pub fn alias_supported(&self) -> bool {
        if !self.is_alias() {
            return true;
        }
        self.record_type
            .as_ref()
            .is_some_and(RecordType::supports_alias)
    }
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod validation_tests;
