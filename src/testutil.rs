// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Test doubles shared by the pipeline stage tests.

use crate::endpoint::Endpoint;
use crate::source::{EventHandler, Source};
use anyhow::Result;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Error returned by a failing [`MockSource`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct MockError(pub String);

/// Source returning a fixed result and counting how it is used.
pub struct MockSource {
    result: Result<Vec<Endpoint>, MockError>,
    endpoints_calls: AtomicUsize,
    handlers: Mutex<Vec<EventHandler>>,
}

impl MockSource {
    pub fn new(endpoints: Vec<Endpoint>) -> Arc<Self> {
        Arc::new(Self {
            result: Ok(endpoints),
            endpoints_calls: AtomicUsize::new(0),
            handlers: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            result: Err(MockError(message.to_string())),
            endpoints_calls: AtomicUsize::new(0),
            handlers: Mutex::new(Vec::new()),
        })
    }

    /// Boxed handle sharing this mock, ready to be wrapped by a stage
    pub fn boxed(self: &Arc<Self>) -> Box<dyn Source> {
        Box::new(Arc::clone(self))
    }

    pub fn endpoints_calls(&self) -> usize {
        self.endpoints_calls.load(Ordering::SeqCst)
    }

    pub fn event_handler_calls(&self) -> usize {
        self.handlers.lock().expect("handlers lock poisoned").len()
    }

    /// Invoke every registered handler, as a watch on real data would.
    pub fn notify(&self) {
        let handlers = self.handlers.lock().expect("handlers lock poisoned").clone();
        for handler in handlers {
            handler();
        }
    }
}

#[async_trait::async_trait]
impl Source for MockSource {
    async fn endpoints(&self) -> Result<Vec<Endpoint>> {
        self.endpoints_calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(anyhow::Error::from)
    }

    fn add_event_handler(&self, handler: EventHandler) {
        self.handlers
            .lock()
            .expect("handlers lock poisoned")
            .push(handler);
    }
}

/// Handler counting its invocations
pub fn counting_handler() -> (EventHandler, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let handler: EventHandler = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (handler, count)
}
