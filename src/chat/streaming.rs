// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Streaming response handling
//!
//! Drives one invocation's event stream: classify each raw event, append
//! answer chunks to the transcript, render trace steps, and yield the
//! resulting units in stream order. Per-event processing is synchronous and
//! testable on its own; `consume` wraps it around the async stream.

use futures::{Stream, StreamExt};
use std::pin::Pin;

use crate::agent::{EventStream, RawEvent};
use crate::chat::classifier::classify;
use crate::chat::event::ClassifiedEvent;
use crate::chat::render::{render_all, RenderableUnit};
use crate::chat::session::Session;
use crate::error::{AgentInvocationError, ChatError, DecodeError, Result};

/// Lazy, ordered sequence of units for one turn
pub type UnitStream<'a> = Pin<Box<dyn Stream<Item = Result<RenderableUnit>> + Send + 'a>>;

/// Consumes one invocation's event stream
#[derive(Debug, Default)]
pub struct ResponseConsumer {
    stats: StreamStats,
}

impl ResponseConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics for the events processed so far
    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Process one raw event and return the units to display
    pub fn process_event(
        &mut self,
        raw: &RawEvent,
        session: &mut Session,
    ) -> std::result::Result<Vec<RenderableUnit>, DecodeError> {
        tracing::trace!(event = %raw, "raw event");
        self.stats.events += 1;

        let units = match classify(raw)? {
            ClassifiedEvent::AnswerChunk(text) => {
                self.stats.answer_chunks += 1;
                session.push_assistant(text.clone());
                vec![RenderableUnit::answer(text)]
            }
            ClassifiedEvent::Trace(steps) => {
                if steps.is_empty() {
                    self.stats.empty_traces += 1;
                }
                self.stats.trace_steps += steps.len();
                render_all(&steps)
            }
            ClassifiedEvent::Unrecognized(raw) => {
                self.stats.unrecognized += 1;
                tracing::debug!(event = %raw, "unrecognized event, ignored");
                vec![]
            }
        };

        self.stats.units += units.len();
        Ok(units)
    }

    /// Drain `events` lazily, appending answer chunks to `session`.
    ///
    /// A transport error mid-stream is classified like an invocation error;
    /// a chunk that cannot be decoded ends the turn with a decode error.
    pub fn consume(mut self, mut events: EventStream, session: &mut Session) -> UnitStream<'_> {
        Box::pin(async_stream::try_stream! {
            while let Some(item) = events.next().await {
                let raw = item.map_err(|e| {
                    let classified = AgentInvocationError::classify(e);
                    tracing::warn!(error = %classified, "agent stream failed");
                    ChatError::Invocation(classified)
                })?;

                let units = self.process_event(&raw, session).map_err(|e| {
                    tracing::warn!(error = %e, "answer chunk could not be decoded");
                    ChatError::Decode(e)
                })?;

                for unit in units {
                    yield unit;
                }
            }

            self.stats.log();
        })
    }
}

/// Statistics about one streamed response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Raw events processed
    pub events: usize,
    /// Answer chunks appended to the transcript
    pub answer_chunks: usize,
    /// Trace steps rendered
    pub trace_steps: usize,
    /// Trace events that carried nothing renderable
    pub empty_traces: usize,
    /// Events that were not understood
    pub unrecognized: usize,
    /// Units yielded
    pub units: usize,
}

impl StreamStats {
    fn log(&self) {
        tracing::debug!(
            events = self.events,
            answer_chunks = self.answer_chunks,
            trace_steps = self.trace_steps,
            empty_traces = self.empty_traces,
            unrecognized = self.unrecognized,
            units = self.units,
            "agent stream complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::mock_gateway::{chunk_event, chunk_event_bytes, trace_event};
    use crate::chat::render::UnitBody;
    use crate::error::TransportError;
    use futures::stream;
    use serde_json::json;

    fn events(items: Vec<std::result::Result<RawEvent, TransportError>>) -> EventStream {
        Box::pin(stream::iter(items))
    }

    #[test]
    fn test_process_chunk_appends_transcript() {
        let mut session = Session::with_id("s");
        let mut consumer = ResponseConsumer::new();

        let units = consumer
            .process_event(&chunk_event("Hello"), &mut session)
            .unwrap();

        assert_eq!(units, vec![RenderableUnit::answer("Hello")]);
        assert_eq!(session.assistant_text_since(0), "Hello");
        assert_eq!(consumer.stats().answer_chunks, 1);
    }

    #[test]
    fn test_process_trace_leaves_transcript_alone() {
        let mut session = Session::with_id("s");
        let mut consumer = ResponseConsumer::new();

        let units = consumer
            .process_event(
                &trace_event(json!({ "rationale": { "text": "why" } })),
                &mut session,
            )
            .unwrap();

        assert_eq!(units.len(), 1);
        assert_eq!(units[0].body, UnitBody::Text("why".to_string()));
        assert!(session.is_empty());
        assert_eq!(consumer.stats().trace_steps, 1);
    }

    #[test]
    fn test_process_unrecognized_and_empty_trace() {
        let mut session = Session::with_id("s");
        let mut consumer = ResponseConsumer::new();

        let units = consumer
            .process_event(&json!({ "returnControl": {} }), &mut session)
            .unwrap();
        assert!(units.is_empty());

        let units = consumer
            .process_event(&json!({ "trace": { "trace": {} } }), &mut session)
            .unwrap();
        assert!(units.is_empty());

        let stats = consumer.stats();
        assert_eq!(stats.events, 2);
        assert_eq!(stats.unrecognized, 1);
        assert_eq!(stats.empty_traces, 1);
        assert_eq!(stats.units, 0);
    }

    #[test]
    fn test_process_invalid_chunk() {
        let mut session = Session::with_id("s");
        let mut consumer = ResponseConsumer::new();

        let err = consumer
            .process_event(&chunk_event_bytes(&[0xff, 0xfe]), &mut session)
            .unwrap_err();

        assert!(matches!(err, DecodeError::InvalidUtf8(_)));
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_consume_yields_in_stream_order() {
        let mut session = Session::with_id("s");
        let stream = ResponseConsumer::new().consume(
            events(vec![
                Ok(chunk_event("one ")),
                Ok(trace_event(json!({ "rationale": { "text": "mid" } }))),
                Ok(chunk_event("two")),
            ]),
            &mut session,
        );

        let units: Vec<_> = stream.collect().await;
        let titles: Vec<_> = units
            .iter()
            .map(|u| u.as_ref().unwrap().title.clone())
            .collect();
        assert_eq!(titles, vec!["answer", "next action decided", "answer"]);

        assert_eq!(session.len(), 2);
        assert_eq!(session.assistant_text_since(0), "one two");
    }

    #[tokio::test]
    async fn test_consume_classifies_stream_error() {
        let mut session = Session::with_id("s");
        let mut stream = ResponseConsumer::new().consume(
            events(vec![
                Ok(chunk_event("part")),
                Err(TransportError::with_code("dependencyFailedException", "asleep")),
                Ok(chunk_event("never seen")),
            ]),
            &mut session,
        );

        assert!(stream.next().await.unwrap().is_ok());
        assert!(matches!(
            stream.next().await.unwrap(),
            Err(ChatError::Invocation(AgentInvocationError::DependencyFailed))
        ));
        assert!(stream.next().await.is_none());
        drop(stream);

        assert_eq!(session.assistant_text_since(0), "part");
    }

    #[tokio::test]
    async fn test_consume_stops_on_decode_error() {
        let mut session = Session::with_id("s");
        let results: Vec<_> = ResponseConsumer::new()
            .consume(
                events(vec![
                    Ok(json!({ "chunk": { "bytes": 42 } })),
                    Ok(chunk_event("never seen")),
                ]),
                &mut session,
            )
            .collect()
            .await;

        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(ChatError::Decode(_))));
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_consume_empty_stream() {
        let mut session = Session::with_id("s");
        let results: Vec<_> = ResponseConsumer::new()
            .consume(events(vec![]), &mut session)
            .collect()
            .await;
        assert!(results.is_empty());
    }
}
