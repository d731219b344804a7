// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! HTTP agent gateway
//!
//! Posts the prompt to the agent runtime and reads the response body as
//! newline-delimited JSON, one raw event per line. Service errors arrive
//! either as a non-2xx response or as an in-stream `...Exception` event.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::agent::gateway::{AgentGateway, EventStream, InvokeRequest, RawEvent};
use crate::config::AgentConfig;
use crate::error::TransportError;

const ERROR_TYPE_HEADER: &str = "x-amzn-ErrorType";

/// Media types a 2xx body may carry: one JSON event per line
const EVENT_CONTENT_TYPES: [&str; 4] = [
    "application/x-ndjson",
    "application/ndjson",
    "application/jsonl",
    "application/json",
];

/// Gateway talking to the agent runtime over HTTP
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InvokeBody<'a> {
    input_text: &'a str,
    enable_trace: bool,
}

impl HttpGateway {
    /// Create a gateway for the configured runtime endpoint
    pub fn new(config: &AgentConfig) -> Self {
        Self::with_base_url(config.endpoint_url())
    }

    /// Create with a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// The base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn invoke_url(&self, request: &InvokeRequest) -> String {
        format!(
            "{}/agents/{}/agentAliases/{}/sessions/{}/text",
            self.base_url, request.agent_id, request.agent_alias_id, request.session_id
        )
    }
}

#[async_trait]
impl AgentGateway for HttpGateway {
    fn name(&self) -> &str {
        "http"
    }

    async fn invoke(&self, request: InvokeRequest) -> Result<EventStream, TransportError> {
        let url = self.invoke_url(&request);
        tracing::debug!(url = %url, session_id = %request.session_id, "invoking agent");

        let response = self
            .client
            .post(&url)
            .header("accept", "application/x-ndjson")
            .json(&InvokeBody {
                input_text: &request.input_text,
                enable_trace: request.enable_trace,
            })
            .send()
            .await
            .map_err(|e| TransportError::other(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_type = response
                .headers()
                .get(ERROR_TYPE_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().await.unwrap_or_default();
            return Err(parse_error_response(status, error_type.as_deref(), &body));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        check_content_type(content_type.as_deref())?;

        let byte_stream = response.bytes_stream();

        let events: EventStream = Box::pin(async_stream::try_stream! {
            let mut buffer: Vec<u8> = Vec::new();

            for await chunk_result in byte_stream {
                let chunk = chunk_result
                    .map_err(|e| TransportError::other(format!("stream interrupted: {}", e)))?;
                buffer.extend_from_slice(&chunk);

                while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    if let Some(event) = parse_event_line(&line)? {
                        yield event;
                    }
                }
            }

            // Final line without a trailing newline
            if let Some(event) = parse_event_line(&buffer)? {
                yield event;
            }
        });

        Ok(events)
    }
}

/// Reject a successful response whose body is not newline-delimited JSON.
///
/// The managed runtime answers with binary event-stream framing, which this
/// client does not decode; it must sit behind an endpoint that re-emits the
/// events as NDJSON. A response without a content type is read as NDJSON.
pub fn check_content_type(content_type: Option<&str>) -> Result<(), TransportError> {
    let Some(content_type) = content_type else {
        return Ok(());
    };

    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if EVENT_CONTENT_TYPES.contains(&media_type.as_str()) {
        Ok(())
    } else {
        tracing::warn!(content_type = %content_type, "agent endpoint did not return NDJSON");
        Err(TransportError::other(format!(
            "unsupported response content type '{}': the agent endpoint must stream \
             newline-delimited JSON (application/x-ndjson)",
            media_type
        )))
    }
}

/// Parse one NDJSON line into a raw event.
///
/// Blank lines yield nothing. Lines that are not JSON are passed on as a JSON
/// string so the classifier can mark them unrecognized. A single-key object
/// whose key ends in `Exception` is an in-stream service error.
pub fn parse_event_line(line: &[u8]) -> Result<Option<RawEvent>, TransportError> {
    let line = line.trim_ascii();
    if line.is_empty() {
        return Ok(None);
    }

    let value: RawEvent = match serde_json::from_slice(line) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "event line is not JSON, passing through as text");
            return Ok(Some(RawEvent::String(
                String::from_utf8_lossy(line).into_owned(),
            )));
        }
    };

    if let Some(object) = value.as_object() {
        if object.len() == 1 {
            if let Some((key, detail)) = object.iter().next() {
                if key.ends_with("Exception") {
                    let message = error_message(detail).unwrap_or_else(|| detail.to_string());
                    return Err(TransportError::with_code(normalize_code(key), message));
                }
            }
        }
    }

    Ok(Some(value))
}

/// Build a transport error from a non-2xx response.
///
/// The code comes from the error-type header (text before any `:`), else
/// from the body's `__type` (text after any `#`).
pub fn parse_error_response(status: u16, error_type: Option<&str>, body: &str) -> TransportError {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

    let code = error_type
        .and_then(|t| t.split(':').next())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| {
            parsed
                .as_ref()
                .and_then(|v| v.get("__type"))
                .and_then(|t| t.as_str())
                .and_then(|t| t.rsplit('#').next())
                .map(str::to_string)
        });

    let message = parsed.as_ref().and_then(error_message).or_else(|| {
        let trimmed = body.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    match (code, message) {
        (Some(code), Some(message)) => TransportError::with_code(normalize_code(&code), message),
        (Some(code), None) => {
            TransportError::with_code(normalize_code(&code), format!("HTTP {}", status))
        }
        (None, Some(message)) => TransportError::other(format!("HTTP {}: {}", status, message)),
        (None, None) => TransportError::other(format!("HTTP {}", status)),
    }
}

fn error_message(detail: &serde_json::Value) -> Option<String> {
    detail
        .get("message")
        .or_else(|| detail.get("Message"))
        .and_then(|m| m.as_str())
        .map(str::to_string)
}

/// Service shape names arrive PascalCase over HTTP (`ThrottlingException`)
/// and camelCase inside event streams (`throttlingException`). Normalize to
/// the camelCase form.
fn normalize_code(code: &str) -> String {
    let mut chars = code.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
