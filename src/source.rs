// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! The capability shared by discovery sources and every pipeline stage.
//!
//! A [`Source`] produces the endpoints of one reconciliation cycle and lets a
//! caller register a callback to be told when its underlying data changes.
//! Pipeline stages implement the same trait and wrap another `Source`, so a
//! whole pipeline is itself a `Source`.
//!
//! # Example
//!
//! ```rust
//! use endpoint_composer::endpoint::{Endpoint, RecordType};
//! use endpoint_composer::source::{EventHandler, Source};
//! use std::sync::Arc;
//!
//! struct Fixed;
//!
//! #[async_trait::async_trait]
//! impl Source for Fixed {
//!     async fn endpoints(&self) -> anyhow::Result<Vec<Endpoint>> {
//!         Ok(vec![Endpoint::new("foo.example.org", RecordType::A, ["192.0.2.1"])])
//!     }
//!
//!     fn add_event_handler(&self, _handler: EventHandler) {}
//! }
//!
//! let handler: EventHandler = Arc::new(|| println!("endpoints changed"));
//! Fixed.add_event_handler(handler);
//! ```

use crate::endpoint::Endpoint;
use anyhow::Result;
use std::sync::Arc;

/// Callback invoked when a source's underlying data changes.
///
/// The same handler may be registered with several sources and may therefore
/// be invoked more than once for a single upstream change; it must be cheap
/// and idempotent.
pub type EventHandler = Arc<dyn Fn() + Send + Sync>;

/// A producer of endpoints.
#[async_trait::async_trait]
pub trait Source: Send + Sync {
    /// Return the endpoints of one reconciliation cycle.
    ///
    /// # Errors
    ///
    /// Any error aborts the pull; no partial endpoint set is returned.
    async fn endpoints(&self) -> Result<Vec<Endpoint>>;

    /// Register a callback for change notifications.
    fn add_event_handler(&self, handler: EventHandler);
}

#[async_trait::async_trait]
impl<S: Source + ?Sized> Source for Box<S> {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        (**self).endpoints().await
    }

    fn add_event_handler(&self, handler: EventHandler) {
        (**self).add_event_handler(handler);
    }
}

#[async_trait::async_trait]
impl<S: Source + ?Sized> Source for Arc<S> {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        (**self).endpoints().await
    }

    fn add_event_handler(&self, handler: EventHandler) {
        (**self).add_event_handler(handler);
    }
}
