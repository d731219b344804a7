// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Event classification
//!
//! Maps one raw stream event onto a [`ClassifiedEvent`]. Pure: no state, no
//! I/O. The only failure is an answer chunk whose payload cannot be decoded,
//! which means the stream is corrupt.
//!
//! Precedence follows the protocol: `chunk` first, then `trace`, then
//! everything else is unrecognized. Inside an orchestration trace every
//! sub-field is checked independently by its own extractor, and the
//! extractors run in a fixed order.

use serde_json::{Map, Value};

use crate::agent::RawEvent;
use crate::chat::event::{ClassifiedEvent, ObservationKind, ToolKind, TraceEvent, TraceKind};
use crate::error::DecodeError;

type Extractor = fn(&Map<String, Value>) -> Option<TraceEvent>;

/// Orchestration sub-field extractors, in output order
const EXTRACTORS: [Extractor; 5] = [
    extract_model_input,
    extract_model_output,
    extract_rationale,
    extract_tool_invocation,
    extract_observation,
];

/// Classify one raw event
pub fn classify(raw: &RawEvent) -> Result<ClassifiedEvent, DecodeError> {
    if let Some(payload) = raw.get("chunk").and_then(|chunk| chunk.get("bytes")) {
        return decode_chunk(payload).map(ClassifiedEvent::AnswerChunk);
    }

    if let Some(trace) = raw.get("trace") {
        return Ok(ClassifiedEvent::Trace(classify_trace(trace)));
    }

    Ok(ClassifiedEvent::Unrecognized(raw.clone()))
}

/// Decode an answer chunk payload: a byte array holding UTF-8, or a string
/// that is already text.
pub fn decode_chunk(payload: &Value) -> Result<String, DecodeError> {
    match payload {
        Value::String(text) => Ok(text.clone()),
        Value::Array(items) => {
            let bytes = items
                .iter()
                .map(|item| item.as_u64().and_then(|n| u8::try_from(n).ok()))
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(|| {
                    DecodeError::InvalidBytes("expected an array of byte values".to_string())
                })?;
            String::from_utf8(bytes).map_err(|e| DecodeError::InvalidUtf8(e.to_string()))
        }
        other => Err(DecodeError::InvalidBytes(format!(
            "expected a byte array or text, got {}",
            json_type_name(other)
        ))),
    }
}

fn classify_trace(trace: &Value) -> Vec<TraceEvent> {
    let Some(orchestration) = trace
        .get("trace")
        .and_then(|inner| inner.get("orchestrationTrace"))
        .and_then(Value::as_object)
    else {
        tracing::debug!("trace event without orchestration data, not rendered");
        return Vec::new();
    };

    EXTRACTORS
        .iter()
        .filter_map(|extract| extract(orchestration))
        .collect()
}

fn extract_model_input(orchestration: &Map<String, Value>) -> Option<TraceEvent> {
    let payload = orchestration.get("modelInvocationInput")?;
    Some(TraceEvent::new(TraceKind::ModelInput, payload.clone()))
}

fn extract_model_output(orchestration: &Map<String, Value>) -> Option<TraceEvent> {
    let payload = orchestration.get("modelInvocationOutput")?;
    Some(TraceEvent::new(TraceKind::ModelOutput, payload.clone()))
}

fn extract_rationale(orchestration: &Map<String, Value>) -> Option<TraceEvent> {
    let payload = orchestration.get("rationale")?;
    Some(TraceEvent::new(TraceKind::Rationale, payload.clone()))
}

fn extract_tool_invocation(orchestration: &Map<String, Value>) -> Option<TraceEvent> {
    let payload = orchestration.get("invocationInput")?;
    let invocation_type = payload.get("invocationType").and_then(Value::as_str);

    match invocation_type.and_then(ToolKind::from_invocation_type) {
        Some(tool) => Some(TraceEvent::new(
            TraceKind::ToolInvocation(tool),
            payload.clone(),
        )),
        None => {
            tracing::debug!(?invocation_type, "unsupported invocation type, skipped");
            None
        }
    }
}

fn extract_observation(orchestration: &Map<String, Value>) -> Option<TraceEvent> {
    let payload = orchestration.get("observation")?;
    let observation_type = payload.get("type").and_then(Value::as_str);

    match observation_type.and_then(ObservationKind::from_observation_type) {
        Some(kind) => Some(TraceEvent::new(TraceKind::Observation(kind), payload.clone())),
        None => {
            tracing::debug!(?observation_type, "unsupported observation type, skipped");
            None
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
