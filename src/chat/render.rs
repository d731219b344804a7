// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Trace rendering
//!
//! Turns classified trace steps into UI-agnostic renderable units. Every
//! optional sub-structure has a documented fallback, so rendering never
//! fails.

use serde::Serialize;
use serde_json::Value;

use crate::chat::event::{ObservationKind, ToolKind, TraceEvent, TraceKind};

/// Placeholder used when a collaborator does not report its name
pub const UNKNOWN_COLLABORATOR: &str = "unknown collaborator";

/// Shown when a knowledge base lookup returned nothing
pub const NO_MATCHING_DOCUMENTS: &str = "no matching documents found";

/// Shown when a collaborator returned no text
pub const NO_TEXT_OUTPUT: &str = "no text output from the sub-agent";

pub const TITLE_MODEL_INPUT: &str = "thinking";
pub const TITLE_MODEL_OUTPUT: &str = "thought complete";
pub const TITLE_RATIONALE: &str = "next action decided";
pub const TITLE_KNOWLEDGE_BASE_LOOKUP: &str = "searching knowledge base";
pub const TITLE_ACTION_GROUP: &str = "running action group";
pub const TITLE_KNOWLEDGE_BASE_RESULT: &str = "knowledge base results";
pub const TITLE_ANSWER: &str = "answer";

/// What a renderable unit shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Part of the final answer
    Answer,
    /// A reasoning step
    Trace(TraceKind),
}

/// Body of a renderable unit
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum UnitBody {
    /// Plain text
    Text(String),
    /// Markdown text
    Markdown(String),
    /// Structured data for a JSON viewer
    Structured(Value),
    /// Informational notice
    Info(String),
}

/// One displayable block handed to the UI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderableUnit {
    pub kind: UnitKind,
    pub title: String,
    pub body: UnitBody,
    pub collapsed: bool,
}

impl RenderableUnit {
    /// An answer chunk, always expanded
    pub fn answer(text: impl Into<String>) -> Self {
        Self {
            kind: UnitKind::Answer,
            title: TITLE_ANSWER.to_string(),
            body: UnitBody::Markdown(text.into()),
            collapsed: false,
        }
    }

    fn trace(kind: TraceKind, title: impl Into<String>, body: UnitBody, collapsed: bool) -> Self {
        Self {
            kind: UnitKind::Trace(kind),
            title: title.into(),
            body,
            collapsed,
        }
    }

    /// Whether this unit is part of the final answer
    pub fn is_answer(&self) -> bool {
        self.kind == UnitKind::Answer
    }
}

/// Text that may or may not hold structured data
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedText {
    Structured(Value),
    RawText(String),
}

impl ParsedText {
    /// Try to read `text` as JSON
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => ParsedText::Structured(value),
            Err(_) => ParsedText::RawText(text.to_string()),
        }
    }

    fn into_body(self) -> UnitBody {
        match self {
            ParsedText::Structured(value) => UnitBody::Structured(value),
            ParsedText::RawText(text) => UnitBody::Text(text),
        }
    }
}

/// What could be read out of a model output payload
#[derive(Debug, Clone, PartialEq)]
enum ModelOutput {
    /// The first content element's text
    Thinking(String),
    /// The first content element, whose text is empty
    EmptyThinking(Value),
    /// The raw response, unparsed
    Unparsed(String),
}

impl ModelOutput {
    fn read(payload: &Value) -> Self {
        let (raw_text, parsed) = match payload.pointer("/rawResponse/content") {
            Some(Value::String(content)) => (content.clone(), serde_json::from_str(content).ok()),
            Some(other) => (other.to_string(), Some(other.clone())),
            None => return ModelOutput::Unparsed(payload.to_string()),
        };

        let first = parsed
            .as_ref()
            .and_then(|response| response.pointer("/content/0"));

        match (first, first.and_then(|element| element.get("text"))) {
            (Some(_), Some(Value::String(text))) if !text.is_empty() => {
                ModelOutput::Thinking(text.clone())
            }
            (Some(element), Some(Value::String(_) | Value::Null)) => {
                ModelOutput::EmptyThinking(element.clone())
            }
            (Some(_), Some(other)) => ModelOutput::Thinking(other.to_string()),
            _ => ModelOutput::Unparsed(raw_text),
        }
    }

    fn into_body(self) -> UnitBody {
        match self {
            ModelOutput::Thinking(text) => UnitBody::Text(text),
            ModelOutput::EmptyThinking(element) => UnitBody::Structured(element),
            ModelOutput::Unparsed(raw) => UnitBody::Text(raw),
        }
    }
}

/// Render one trace step
pub fn render(event: &TraceEvent) -> RenderableUnit {
    let payload = &event.payload;

    match event.kind {
        TraceKind::ModelInput => {
            let body = match payload.get("text") {
                Some(Value::String(text)) => {
                    let parsed = ParsedText::parse(text);
                    if matches!(parsed, ParsedText::RawText(_)) {
                        tracing::trace!("model input is not JSON, rendering as text");
                    }
                    parsed.into_body()
                }
                Some(Value::Null) | None => UnitBody::Text(String::new()),
                Some(other) => UnitBody::Structured(other.clone()),
            };
            RenderableUnit::trace(event.kind, TITLE_MODEL_INPUT, body, true)
        }
        TraceKind::ModelOutput => RenderableUnit::trace(
            event.kind,
            TITLE_MODEL_OUTPUT,
            ModelOutput::read(payload).into_body(),
            true,
        ),
        TraceKind::Rationale => RenderableUnit::trace(
            event.kind,
            TITLE_RATIONALE,
            UnitBody::Text(text_at(payload, "/text")),
            false,
        ),
        TraceKind::ToolInvocation(ToolKind::AgentCollaborator) => {
            let name = collaborator_name(payload, "/agentCollaboratorInvocationInput");
            RenderableUnit::trace(
                event.kind,
                format!("calling sub-agent \"{}\"", name),
                UnitBody::Text(text_at(
                    payload,
                    "/agentCollaboratorInvocationInput/input/text",
                )),
                false,
            )
        }
        TraceKind::ToolInvocation(ToolKind::KnowledgeBase) => RenderableUnit::trace(
            event.kind,
            TITLE_KNOWLEDGE_BASE_LOOKUP,
            UnitBody::Text(text_at(payload, "/knowledgeBaseLookupInput/text")),
            true,
        ),
        TraceKind::ToolInvocation(ToolKind::ActionGroup) => RenderableUnit::trace(
            event.kind,
            TITLE_ACTION_GROUP,
            UnitBody::Structured(
                payload
                    .get("actionGroupInvocationInput")
                    .cloned()
                    .unwrap_or(Value::Null),
            ),
            true,
        ),
        TraceKind::Observation(ObservationKind::KnowledgeBaseResult) => {
            let body = match payload
                .pointer("/knowledgeBaseLookupOutput/retrievedReferences")
                .and_then(Value::as_array)
            {
                Some(references) if !references.is_empty() => {
                    UnitBody::Structured(Value::Array(references.clone()))
                }
                _ => UnitBody::Info(NO_MATCHING_DOCUMENTS.to_string()),
            };
            RenderableUnit::trace(event.kind, TITLE_KNOWLEDGE_BASE_RESULT, body, true)
        }
        TraceKind::Observation(ObservationKind::AgentCollaboratorResult) => {
            let name = collaborator_name(payload, "/agentCollaboratorInvocationOutput");
            let body = match payload
                .pointer("/agentCollaboratorInvocationOutput/output/text")
                .and_then(Value::as_str)
            {
                Some(text) if !text.is_empty() => UnitBody::Markdown(text.to_string()),
                _ => UnitBody::Info(NO_TEXT_OUTPUT.to_string()),
            };
            RenderableUnit::trace(
                event.kind,
                format!("response from sub-agent \"{}\"", name),
                body,
                false,
            )
        }
    }
}

/// Render trace steps in order, one unit per step
pub fn render_all(events: &[TraceEvent]) -> Vec<RenderableUnit> {
    events.iter().map(render).collect()
}

fn text_at(payload: &Value, pointer: &str) -> String {
    payload
        .pointer(pointer)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn collaborator_name<'a>(payload: &'a Value, parent: &str) -> &'a str {
    payload
        .pointer(&format!("{}/agentCollaboratorName", parent))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(UNKNOWN_COLLABORATOR)
}
