// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::sync::Arc;

use agentchat::agent::mock_gateway::{chunk_event, trace_event, MockGateway};
use agentchat::chat::{classify, render_all, ChatSession, ClassifiedEvent, Role, TraceKind};
use agentchat::config::AgentConfig;
use proptest::prelude::*;
use serde_json::{json, Map, Value};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z ]{0,12}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map(
                prop_oneof![
                    Just("chunk".to_string()),
                    Just("bytes".to_string()),
                    Just("trace".to_string()),
                    Just("orchestrationTrace".to_string()),
                    Just("rationale".to_string()),
                    Just("invocationInput".to_string()),
                    Just("observation".to_string()),
                    Just("type".to_string()),
                    "[a-z]{1,8}",
                ],
                inner,
                0..5,
            )
            .prop_map(|map| Value::Object(map.into_iter().collect::<Map<String, Value>>())),
        ]
    })
}

/// The five orchestration sub-fields with payloads that always classify
fn sub_fields() -> [(&'static str, Value); 5] {
    [
        ("modelInvocationInput", json!({ "text": "input" })),
        (
            "modelInvocationOutput",
            json!({ "rawResponse": { "content": "{\"content\":[{\"text\":\"out\"}]}" } }),
        ),
        ("rationale", json!({ "text": "because" })),
        (
            "invocationInput",
            json!({ "invocationType": "KNOWLEDGE_BASE", "knowledgeBaseLookupInput": { "text": "q" } }),
        ),
        (
            "observation",
            json!({ "type": "KNOWLEDGE_BASE", "knowledgeBaseLookupOutput": {} }),
        ),
    ]
}

fn kind_rank(kind: &TraceKind) -> usize {
    match kind {
        TraceKind::ModelInput => 0,
        TraceKind::ModelOutput => 1,
        TraceKind::Rationale => 2,
        TraceKind::ToolInvocation(_) => 3,
        TraceKind::Observation(_) => 4,
    }
}

proptest! {
    #[test]
    fn classify_never_panics_and_is_idempotent(raw in arb_json()) {
        let first = classify(&raw);
        let second = classify(&raw);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn trace_with_n_sub_fields_yields_n_units_in_order(mask in 0u8..32) {
        let mut orchestration = Map::new();
        for (i, (key, payload)) in sub_fields().into_iter().enumerate() {
            if mask & (1 << i) != 0 {
                orchestration.insert(key.to_string(), payload);
            }
        }
        let expected = mask.count_ones() as usize;

        let steps = match classify(&trace_event(Value::Object(orchestration))) {
            Ok(ClassifiedEvent::Trace(steps)) => steps,
            other => return Err(TestCaseError::fail(format!("expected a trace, got {:?}", other))),
        };
        prop_assert_eq!(steps.len(), expected);

        let ranks: Vec<usize> = steps.iter().map(|s| kind_rank(&s.kind)).collect();
        let mut sorted = ranks.clone();
        sorted.sort_unstable();
        prop_assert_eq!(&ranks, &sorted);

        prop_assert_eq!(render_all(&steps).len(), expected);
    }

    #[test]
    fn k_chunks_append_k_assistant_entries(chunks in prop::collection::vec("[a-z ]{1,10}", 0..8)) {
        let events = chunks.iter().map(|c| chunk_event(c)).collect();
        let gateway = MockGateway::new().with_events(events);
        let mut chat = ChatSession::new(
            AgentConfig::new("AGENT", "ALIAS", "us-east-1"),
            Arc::new(gateway),
        );

        let units = tokio_test::block_on(chat.submit_and_collect("prompt"))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(units.len(), chunks.len());

        let transcript = chat.session().transcript();
        prop_assert_eq!(transcript.len(), chunks.len() + 1);
        prop_assert_eq!(transcript[0].role, Role::User);
        for (entry, chunk) in transcript[1..].iter().zip(&chunks) {
            prop_assert_eq!(entry.role, Role::Assistant);
            prop_assert_eq!(&entry.text, chunk);
        }
    }
}
