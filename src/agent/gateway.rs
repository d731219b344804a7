// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Agent gateway trait and request types
//!
//! A gateway turns one prompt into an ordered stream of raw events. The
//! events are untyped: classification happens in `chat::classifier`.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

use crate::config::AgentConfig;
use crate::error::TransportError;

/// One untyped event from the agent's response stream
pub type RawEvent = serde_json::Value;

/// Ordered, finite stream of raw events for a single invocation
pub type EventStream = Pin<Box<dyn Stream<Item = Result<RawEvent, TransportError>> + Send>>;

/// Capability to invoke the remote agent
#[async_trait]
pub trait AgentGateway: Send + Sync {
    /// Get the gateway name (e.g., "http", "mock")
    fn name(&self) -> &str;

    /// Start an invocation and return its event stream
    async fn invoke(&self, request: InvokeRequest) -> Result<EventStream, TransportError>;
}

/// Request for one agent invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeRequest {
    /// Agent identifier
    pub agent_id: String,

    /// Agent alias identifier
    pub agent_alias_id: String,

    /// Session correlation key
    pub session_id: String,

    /// Prompt text
    pub input_text: String,

    /// Whether the agent should emit trace events
    pub enable_trace: bool,
}

impl InvokeRequest {
    /// Create a request for the configured agent, with tracing enabled
    pub fn new(
        config: &AgentConfig,
        session_id: impl Into<String>,
        input_text: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: config.agent_id.clone(),
            agent_alias_id: config.agent_alias_id.clone(),
            session_id: session_id.into(),
            input_text: input_text.into(),
            enable_trace: true,
        }
    }
}
