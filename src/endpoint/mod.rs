// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Endpoint data model shared by every pipeline stage.
//!
//! An [`Endpoint`] is a single DNS binding candidate: a name, a record type,
//! an ordered list of targets and the metadata discovery sources attach to it.
//! Endpoints are built fresh by discovery sources on every pull and moved
//! through the pipeline by value.
//!
//! # Example
//!
//! ```rust
//! use endpoint_composer::endpoint::{Endpoint, RecordType, Ttl};
//!
//! let ep = Endpoint::with_ttl("www.example.org.", RecordType::A, Ttl(300), ["192.0.2.10"])
//!     .with_set_identifier("blue")
//!     .with_label("resource", "service/default/www");
//!
//! assert_eq!(ep.dns_name, "www.example.org");
//! assert_eq!(ep.identity_key(), "A/www.example.org/blue/192.0.2.10");
//! ```

pub mod target_filter;
pub mod validation;

use crate::constants::{IDENTITY_KEY_SEPARATOR, TARGET_SEPARATOR};
use kube::{Resource, ResourceExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::net::IpAddr;
use std::ops::Deref;

pub use target_filter::{TargetFilter, TargetNetFilter};

/// DNS record type of an endpoint.
///
/// Types the pipeline does not interpret are kept verbatim in [`RecordType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Txt,
    Srv,
    Ns,
    Ptr,
    Mx,
    Naptr,
    Other(String),
}

impl RecordType {
    /// Upper-case wire name of the record type
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Txt => "TXT",
            Self::Srv => "SRV",
            Self::Ns => "NS",
            Self::Ptr => "PTR",
            Self::Mx => "MX",
            Self::Naptr => "NAPTR",
            Self::Other(other) => other,
        }
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "CNAME" => Self::Cname,
            "TXT" => Self::Txt,
            "SRV" => Self::Srv,
            "NS" => Self::Ns,
            "PTR" => Self::Ptr,
            "MX" => Self::Mx,
            "NAPTR" => Self::Naptr,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record TTL in seconds. Zero means unset (provider default).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Ttl(pub i64);

impl Ttl {
    /// Returns true if the TTL is explicitly configured
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.0 > 0
    }

    fn is_unset(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered list of endpoint targets.
///
/// The meaning of each string depends on the record type: a plain address for
/// A/AAAA, a multi-field string for MX/SRV/NAPTR, free text for TXT.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Targets(Vec<String>);

impl Targets {
    /// Build a target list from any sequence of strings
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(targets.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, target: impl Into<String>) {
        self.0.push(target.into());
    }

    /// Copy of the list with repeated values removed, first occurrence order kept.
    #[must_use]
    pub fn deduplicated(&self) -> Self {
        let mut seen = HashSet::with_capacity(self.0.len());
        Self(
            self.0
                .iter()
                .filter(|target| seen.insert(target.as_str()))
                .cloned()
                .collect(),
        )
    }

    /// Order-insensitive rendering of the distinct target values.
    ///
    /// Two lists holding the same values in any order and with any repetition
    /// produce the same string.
    #[must_use]
    pub fn canonical(&self) -> String {
        let mut values: Vec<&str> = self.0.iter().map(String::as_str).collect();
        values.sort_unstable();
        values.dedup();
        values.join(TARGET_SEPARATOR)
    }
}

impl Deref for Targets {
    type Target = [String];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<String>> for Targets {
    fn from(targets: Vec<String>) -> Self {
        Self(targets)
    }
}

impl FromIterator<String> for Targets {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Targets {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Targets {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Targets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(TARGET_SEPARATOR))
    }
}

/// Free-form annotations carried for downstream bookkeeping. Not part of identity.
pub type Labels = BTreeMap<String, String>;

/// Backend-specific hint attached to an endpoint, e.g. `alias=true`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderSpecificProperty {
    pub name: String,
    pub value: String,
}

/// Ordered list of backend-specific hints
pub type ProviderSpecific = Vec<ProviderSpecificProperty>;

/// Weak back-reference to the cluster object an endpoint was generated from.
///
/// Only used to attribute events. Never part of identity or ownership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RefObject {
    pub kind: String,
    pub namespace: String,
    pub name: String,
    pub uid: String,
    /// Tag of the discovery source that produced the endpoint (e.g. "service")
    pub source: String,
}

impl RefObject {
    /// Build a reference to any Kubernetes object.
    pub fn from_resource<K>(obj: &K, source: &str) -> Self
    where
        K: Resource<DynamicType = ()>,
    {
        Self {
            kind: K::kind(&()).to_string(),
            namespace: obj.namespace().unwrap_or_default(),
            name: obj.name_any(),
            uid: obj.uid().unwrap_or_default(),
            source: source.to_string(),
        }
    }
}

/// A single DNS binding candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// The hostname of the DNS record
    pub dns_name: String,
    /// The targets the DNS record points to
    #[serde(default, skip_serializing_if = "Targets::is_empty")]
    pub targets: Targets,
    /// Type of record, `None` when the source left it unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<RecordType>,
    /// Distinguishes records sharing name and type (weighted or multi-value sets)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub set_identifier: String,
    #[serde(default, rename = "recordTTL", skip_serializing_if = "Ttl::is_unset")]
    pub record_ttl: Ttl,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: Labels,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provider_specific: ProviderSpecific,
    #[serde(skip)]
    pub ref_object: Option<RefObject>,
}

impl Endpoint {
    /// Create an endpoint with an unset TTL.
    ///
    /// A trailing dot is trimmed from the name and from every target.
    pub fn new<I, S>(dns_name: &str, record_type: RecordType, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_ttl(dns_name, record_type, Ttl::default(), targets)
    }

    /// Create an endpoint with the given TTL.
    pub fn with_ttl<I, S>(dns_name: &str, record_type: RecordType, ttl: Ttl, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let targets = targets
            .into_iter()
            .map(|target| {
                let mut target: String = target.into();
                if target.ends_with('.') {
                    target.pop();
                }
                target
            })
            .collect();

        Self {
            dns_name: dns_name.strip_suffix('.').unwrap_or(dns_name).to_string(),
            targets,
            record_type: Some(record_type),
            record_ttl: ttl,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_set_identifier(mut self, set_identifier: &str) -> Self {
        self.set_identifier = set_identifier.to_string();
        self
    }

    /// Attach a provider-specific property, replacing one of the same name.
    #[must_use]
    pub fn with_provider_specific(mut self, name: &str, value: &str) -> Self {
        self.set_provider_specific_property(name, value);
        self
    }

    #[must_use]
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_ref_object(mut self, ref_object: RefObject) -> Self {
        self.ref_object = Some(ref_object);
        self
    }

    /// Value of a provider-specific property, if present
    #[must_use]
    pub fn provider_specific_property(&self, name: &str) -> Option<&str> {
        self.provider_specific
            .iter()
            .find(|property| property.name == name)
            .map(|property| property.value.as_str())
    }

    /// Set a provider-specific property in place, or append it if absent.
    pub fn set_provider_specific_property(&mut self, name: &str, value: &str) {
        if let Some(property) = self
            .provider_specific
            .iter_mut()
            .find(|property| property.name == name)
        {
            property.value = value.to_string();
            return;
        }

        self.provider_specific.push(ProviderSpecificProperty {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    pub fn delete_provider_specific_property(&mut self, name: &str) {
        self.provider_specific.retain(|property| property.name != name);
    }

    /// Upper-case record type, or an empty string when unset
    #[must_use]
    pub fn record_type_str(&self) -> &str {
        self.record_type.as_ref().map_or("", RecordType::as_str)
    }

    /// Identity of the logical record: `RecordType/DNSName/SetIdentifier/targets`.
    ///
    /// Targets are rendered canonically, so repeated or reordered targets yield
    /// the same key. Labels, TTL, provider-specific data and the back-reference
    /// are not part of identity.
    #[must_use]
    pub fn identity_key(&self) -> String {
        [
            self.record_type_str(),
            self.dns_name.as_str(),
            self.set_identifier.as_str(),
            self.targets.canonical().as_str(),
        ]
        .join(IDENTITY_KEY_SEPARATOR)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} IN {} {} {} {:?}",
            self.dns_name,
            self.record_ttl,
            self.record_type_str(),
            self.set_identifier,
            self.targets,
            self.provider_specific
        )
    }
}

/// Record type suitable for a bare target: A for IPv4, AAAA for IPv6, CNAME otherwise.
#[must_use]
pub fn suitable_type(target: &str) -> RecordType {
    match target.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => RecordType::A,
        Ok(IpAddr::V6(_)) => RecordType::Aaaa,
        Err(_) => RecordType::Cname,
    }
}

/// Build endpoints for a hostname from a mixed list of targets.
///
/// Targets are grouped by [`suitable_type`] and one endpoint is returned per
/// non-empty group, in the order A, AAAA, CNAME. Each endpoint receives the
/// given TTL, provider-specific data and set identifier.
#[must_use]
pub fn endpoints_for_hostname(
    hostname: &str,
    targets: &Targets,
    ttl: Ttl,
    provider_specific: &ProviderSpecific,
    set_identifier: &str,
) -> Vec<Endpoint> {
    let mut a_targets = Targets::default();
    let mut aaaa_targets = Targets::default();
    let mut cname_targets = Targets::default();

    for target in targets {
        match suitable_type(target) {
            RecordType::A => a_targets.push(target.as_str()),
            RecordType::Aaaa => aaaa_targets.push(target.as_str()),
            _ => cname_targets.push(target.as_str()),
        }
    }

    [
        (RecordType::A, a_targets),
        (RecordType::Aaaa, aaaa_targets),
        (RecordType::Cname, cname_targets),
    ]
    .into_iter()
    .filter(|(_, group)| !group.is_empty())
    .map(|(record_type, group)| {
        let mut ep = Endpoint::with_ttl(hostname, record_type, ttl, group);
        ep.provider_specific = provider_specific.clone();
        ep.set_identifier = set_identifier.to_string();
        ep
    })
    .collect()
}
