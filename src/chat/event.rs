// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Classified event types
//!
//! The closed taxonomy every raw stream event is mapped into.

use serde::{Deserialize, Serialize};

use crate::agent::RawEvent;

/// Which tool the agent is invoking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    /// Another agent acting as a collaborator
    AgentCollaborator,
    /// A knowledge base lookup
    KnowledgeBase,
    /// An action group (backed by a function)
    ActionGroup,
}

impl ToolKind {
    /// Map an `invocationType` value onto a tool kind
    pub fn from_invocation_type(invocation_type: &str) -> Option<Self> {
        match invocation_type {
            "AGENT_COLLABORATOR" => Some(ToolKind::AgentCollaborator),
            "KNOWLEDGE_BASE" => Some(ToolKind::KnowledgeBase),
            "ACTION_GROUP" => Some(ToolKind::ActionGroup),
            _ => None,
        }
    }
}

/// Which tool result the agent observed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationKind {
    /// References retrieved from a knowledge base
    KnowledgeBaseResult,
    /// Output returned by a collaborator agent
    AgentCollaboratorResult,
}

impl ObservationKind {
    /// Map an observation `type` value onto an observation kind
    pub fn from_observation_type(observation_type: &str) -> Option<Self> {
        match observation_type {
            "KNOWLEDGE_BASE" => Some(ObservationKind::KnowledgeBaseResult),
            "AGENT_COLLABORATOR" => Some(ObservationKind::AgentCollaboratorResult),
            _ => None,
        }
    }
}

/// Kind of one step of the agent's reasoning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    /// Prompt sent to the model
    ModelInput,
    /// Raw model response
    ModelOutput,
    /// Why the agent chose its next action
    Rationale,
    /// A tool call
    ToolInvocation(ToolKind),
    /// A tool result
    Observation(ObservationKind),
}

/// One trace step together with the orchestration sub-structure it came from
#[derive(Debug, Clone, PartialEq)]
pub struct TraceEvent {
    pub kind: TraceKind,
    pub payload: serde_json::Value,
}

impl TraceEvent {
    pub fn new(kind: TraceKind, payload: serde_json::Value) -> Self {
        Self { kind, payload }
    }
}

/// Result of classifying one raw event
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifiedEvent {
    /// A fragment of the final answer
    AnswerChunk(String),
    /// Zero or more reasoning steps, in fixed order
    Trace(Vec<TraceEvent>),
    /// Anything this client does not understand
    Unrecognized(RawEvent),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_kind_from_invocation_type() {
        assert_eq!(
            ToolKind::from_invocation_type("AGENT_COLLABORATOR"),
            Some(ToolKind::AgentCollaborator)
        );
        assert_eq!(
            ToolKind::from_invocation_type("KNOWLEDGE_BASE"),
            Some(ToolKind::KnowledgeBase)
        );
        assert_eq!(
            ToolKind::from_invocation_type("ACTION_GROUP"),
            Some(ToolKind::ActionGroup)
        );
        assert_eq!(ToolKind::from_invocation_type("FINISH"), None);
        assert_eq!(ToolKind::from_invocation_type("action_group"), None);
    }

    #[test]
    fn test_observation_kind_from_type() {
        assert_eq!(
            ObservationKind::from_observation_type("KNOWLEDGE_BASE"),
            Some(ObservationKind::KnowledgeBaseResult)
        );
        assert_eq!(
            ObservationKind::from_observation_type("AGENT_COLLABORATOR"),
            Some(ObservationKind::AgentCollaboratorResult)
        );
        assert_eq!(ObservationKind::from_observation_type("FINISH"), None);
    }

    #[test]
    fn test_trace_kind_serialization() {
        let json = serde_json::to_value(TraceKind::ToolInvocation(ToolKind::KnowledgeBase)).unwrap();
        assert_eq!(json, serde_json::json!({ "tool_invocation": "knowledge_base" }));

        let json = serde_json::to_value(TraceKind::Rationale).unwrap();
        assert_eq!(json, serde_json::json!("rationale"));
    }
}
