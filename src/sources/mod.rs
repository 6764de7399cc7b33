// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Discovery sources that do not need a cluster.
//!
//! - [`StaticSource`] serves a fixed, in-memory list of endpoints
//! - [`FileSource`] reads an endpoint manifest from disk on every pull

pub mod file_source;
pub mod static_source;

pub use file_source::{load_yaml, EndpointManifest, FileSource};
pub use static_source::StaticSource;
