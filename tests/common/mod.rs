// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

// Common test utilities for integration tests

use endpoint_composer::endpoint::Endpoint;
use endpoint_composer::source::{EventHandler, Source};
use endpoint_composer::sources::StaticSource;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::NamedTempFile;

/// Box a static source for `wrap_sources`
pub fn static_source(endpoints: Vec<Endpoint>) -> Box<dyn Source> {
    Box::new(StaticSource::new(endpoints))
}

/// Write an endpoint manifest to a temporary file
pub fn write_manifest(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp manifest");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp manifest");
    file
}

/// Source that records how many event handlers were registered with it
#[derive(Default)]
pub struct RecordingSource {
    registrations: AtomicUsize,
}

impl RecordingSource {
    pub fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Source for RecordingSource {
    async fn endpoints(&self) -> anyhow::Result<Vec<Endpoint>> {
        Ok(Vec::new())
    }

    fn add_event_handler(&self, _handler: EventHandler) {
        self.registrations.fetch_add(1, Ordering::SeqCst);
    }
}

/// Shared recording source plus a boxed handle to hand to the pipeline
pub fn recording_source() -> (Arc<RecordingSource>, Box<dyn Source>) {
    let source = Arc::new(RecordingSource::default());
    let boxed: Box<dyn Source> = Box::new(Arc::clone(&source));
    (source, boxed)
}
