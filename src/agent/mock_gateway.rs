// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Mock agent gateway for testing
//!
//! Provides a scripted implementation of the AgentGateway trait that can be
//! used in tests without a running agent runtime.

use async_trait::async_trait;
use futures::stream;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::agent::gateway::{AgentGateway, EventStream, InvokeRequest, RawEvent};
use crate::error::TransportError;

/// A scripted gateway for testing
#[derive(Clone)]
pub struct MockGateway {
    /// Gateway name
    name: String,
    /// Scripted turns, one per invocation
    turns: Arc<Mutex<Vec<MockTurn>>>,
    /// Call counter
    call_count: Arc<AtomicUsize>,
    /// Recorded requests
    recorded_requests: Arc<Mutex<Vec<InvokeRequest>>>,
}

/// What the mock does for one invocation
#[derive(Clone, Debug)]
pub enum MockTurn {
    /// The invocation succeeds and streams these items in order
    Events(Vec<Result<RawEvent, TransportError>>),
    /// The invocation itself is rejected
    Rejected(TransportError),
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("Mock gateway lock was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

impl MockGateway {
    /// Create a mock that answers every prompt with a single chunk
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            turns: Arc::new(Mutex::new(vec![MockTurn::Events(vec![Ok(chunk_event(
                "Mock response",
            ))])])),
            call_count: Arc::new(AtomicUsize::new(0)),
            recorded_requests: Arc::new(Mutex::new(vec![])),
        }
    }

    /// Create a mock gateway with a custom name
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut gateway = Self::new();
        gateway.name = name.into();
        gateway
    }

    /// Stream these events on every invocation
    pub fn with_events(self, events: Vec<RawEvent>) -> Self {
        self.with_turns(vec![MockTurn::Events(
            events.into_iter().map(Ok).collect(),
        )])
    }

    /// Stream these events, then fail with `error`
    pub fn with_stream_error(self, events: Vec<RawEvent>, error: TransportError) -> Self {
        let mut items: Vec<Result<RawEvent, TransportError>> =
            events.into_iter().map(Ok).collect();
        items.push(Err(error));
        self.with_turns(vec![MockTurn::Events(items)])
    }

    /// Reject every invocation with `error`
    pub fn with_rejection(self, error: TransportError) -> Self {
        self.with_turns(vec![MockTurn::Rejected(error)])
    }

    /// Queue multiple turns (played in order, the last one repeats)
    pub fn with_turns(self, turns: Vec<MockTurn>) -> Self {
        {
            let mut queued = lock(&self.turns);
            queued.clear();
            queued.extend(turns);
        }
        self
    }

    /// Get the number of times invoke() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Get all recorded requests
    pub fn recorded_requests(&self) -> Vec<InvokeRequest> {
        lock(&self.recorded_requests).clone()
    }

    /// Get the last request made
    pub fn last_request(&self) -> Option<InvokeRequest> {
        lock(&self.recorded_requests).last().cloned()
    }

    /// Reset call count and recorded requests
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        lock(&self.recorded_requests).clear();
    }

    fn next_turn(&self) -> MockTurn {
        let count = self.call_count.fetch_add(1, Ordering::SeqCst);
        let turns = lock(&self.turns);
        if turns.is_empty() {
            MockTurn::Events(vec![])
        } else {
            turns[count.min(turns.len() - 1)].clone()
        }
    }
}

#[async_trait]
impl AgentGateway for MockGateway {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, request: InvokeRequest) -> Result<EventStream, TransportError> {
        lock(&self.recorded_requests).push(request);

        match self.next_turn() {
            MockTurn::Events(items) => Ok(Box::pin(stream::iter(items))),
            MockTurn::Rejected(error) => Err(error),
        }
    }
}

/// An answer chunk event carrying `text` as UTF-8 bytes
pub fn chunk_event(text: &str) -> RawEvent {
    chunk_event_bytes(text.as_bytes())
}

/// An answer chunk event carrying arbitrary bytes
pub fn chunk_event_bytes(bytes: &[u8]) -> RawEvent {
    serde_json::json!({ "chunk": { "bytes": bytes } })
}

/// A trace event wrapping an orchestration trace
pub fn trace_event(orchestration: serde_json::Value) -> RawEvent {
    serde_json::json!({ "trace": { "trace": { "orchestrationTrace": orchestration } } })
}
