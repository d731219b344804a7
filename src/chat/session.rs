// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chat session management
//!
//! A [`Session`] is the conversation: its correlation id and append-only
//! transcript. A [`ChatSession`] owns one session together with the agent
//! gateway and turns prompts into unit streams. Only one turn can be in
//! flight: the returned stream borrows the session mutably until dropped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::{AgentGateway, InvokeRequest};
use crate::chat::render::RenderableUnit;
use crate::chat::streaming::{ResponseConsumer, UnitStream};
use crate::config::AgentConfig;
use crate::error::{AgentInvocationError, ChatError, Result};

/// Who wrote a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl TranscriptEntry {
    fn new(role: Role, text: String) -> Self {
        Self {
            role,
            text,
            timestamp: Utc::now(),
        }
    }
}

/// A conversation with the remote agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    id: String,
    created_at: DateTime<Utc>,
    transcript: Vec<TranscriptEntry>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Start a session with a fresh random id
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// Start a session with a known id
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
            transcript: Vec::new(),
        }
    }

    /// Correlation key the agent uses to continue the conversation
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The transcript, in conversation order
    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    pub fn len(&self) -> usize {
        self.transcript.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty()
    }

    pub(crate) fn push_user(&mut self, text: impl Into<String>) {
        self.transcript
            .push(TranscriptEntry::new(Role::User, text.into()));
    }

    pub(crate) fn push_assistant(&mut self, text: impl Into<String>) {
        self.transcript
            .push(TranscriptEntry::new(Role::Assistant, text.into()));
    }

    /// Join the assistant entries recorded from `index` onwards.
    ///
    /// Each answer chunk is its own entry; this is how a caller gets the
    /// whole reply of one turn as a single string.
    pub fn assistant_text_since(&self, index: usize) -> String {
        self.transcript
            .iter()
            .skip(index)
            .filter(|entry| entry.role == Role::Assistant)
            .map(|entry| entry.text.as_str())
            .collect()
    }
}

/// A session bound to an agent gateway
pub struct ChatSession {
    session: Session,
    config: AgentConfig,
    gateway: Arc<dyn AgentGateway>,
}

impl ChatSession {
    /// Start a new session against the configured agent
    pub fn new(config: AgentConfig, gateway: Arc<dyn AgentGateway>) -> Self {
        Self::with_session(config, gateway, Session::new())
    }

    /// Continue an existing session
    pub fn with_session(
        config: AgentConfig,
        gateway: Arc<dyn AgentGateway>,
        session: Session,
    ) -> Self {
        Self {
            session,
            config,
            gateway,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Give the session back to the caller
    pub fn into_session(self) -> Session {
        self.session
    }

    /// Send a prompt and return the lazy stream of units it produces.
    ///
    /// The prompt is recorded before the agent is invoked, so it stays in the
    /// transcript even if the invocation fails.
    pub async fn submit(&mut self, prompt: &str) -> Result<UnitStream<'_>> {
        if prompt.trim().is_empty() {
            return Err(ChatError::InvalidInput(
                "prompt must not be empty".to_string(),
            ));
        }

        self.session.push_user(prompt);

        let request = InvokeRequest::new(&self.config, self.session.id(), prompt);
        tracing::debug!(
            gateway = self.gateway.name(),
            session_id = %request.session_id,
            "submitting prompt"
        );

        let events = self.gateway.invoke(request).await.map_err(|e| {
            let classified = AgentInvocationError::classify(e);
            tracing::warn!(
                error = %classified,
                classified = classified.is_classified(),
                "agent invocation failed"
            );
            ChatError::Invocation(classified)
        })?;

        Ok(ResponseConsumer::new().consume(events, &mut self.session))
    }

    /// Submit a prompt and drain its stream, stopping at the first error
    pub async fn submit_and_collect(&mut self, prompt: &str) -> Result<Vec<RenderableUnit>> {
        let mut stream = self.submit(prompt).await?;
        let mut units = Vec::new();
        while let Some(unit) = stream.next().await {
            units.push(unit?);
        }
        Ok(units)
    }
}
