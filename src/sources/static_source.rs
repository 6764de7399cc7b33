// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

use crate::endpoint::Endpoint;
use crate::source::{EventHandler, Source};
use anyhow::Result;

/// Source serving the same endpoints on every pull.
///
/// The data never changes, so registered event handlers are never invoked.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    endpoints: Vec<Endpoint>,
}

impl StaticSource {
    #[must_use]
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }
}

#[async_trait::async_trait]
impl Source for StaticSource {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        Ok(self.endpoints.clone())
    }

    fn add_event_handler(&self, _handler: EventHandler) {}
}
