// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Display formatting for chat interface
//!
//! This module provides testable formatting functions for displaying
//! renderable units, transcripts and errors. Functions return formatted
//! strings rather than writing directly to stdout, making them easy to test.

use crate::chat::render::{RenderableUnit, UnitBody};
use crate::chat::session::{Role, TranscriptEntry};
use crate::error::ChatError;

const COLLAPSED_MARKER: &str = "▸";
const EXPANDED_MARKER: &str = "▾";
const BODY_INDENT: &str = "    ";

/// Format one unit for a terminal.
///
/// Answer units print their text as is, so consecutive chunks read as one
/// reply. Trace units print a title line, and their body only when expanded
/// (or when `expand_all` is set).
pub fn format_unit(unit: &RenderableUnit, expand_all: bool) -> String {
    if unit.is_answer() {
        return format_body(&unit.body);
    }

    let show_body = expand_all || !unit.collapsed;
    let marker = if show_body {
        EXPANDED_MARKER
    } else {
        COLLAPSED_MARKER
    };

    let mut output = format!("{} {}\n", marker, unit.title);
    if show_body {
        let body = format_body(&unit.body);
        for line in body.lines() {
            if line.is_empty() {
                output.push('\n');
            } else {
                output.push_str(BODY_INDENT);
                output.push_str(line);
                output.push('\n');
            }
        }
    }
    output
}

/// Format a unit body as plain text
pub fn format_body(body: &UnitBody) -> String {
    match body {
        UnitBody::Text(text) | UnitBody::Markdown(text) => text.clone(),
        UnitBody::Structured(value) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        UnitBody::Info(text) => format!("(i) {}", text),
    }
}

/// Format a transcript for the `/history` command.
///
/// Consecutive assistant entries are the chunks of one reply and are joined.
pub fn format_transcript(entries: &[TranscriptEntry]) -> String {
    let mut output = String::new();
    let mut previous: Option<Role> = None;

    for entry in entries {
        match (previous, entry.role) {
            (Some(Role::Assistant), Role::Assistant) => output.push_str(&entry.text),
            (_, role) => {
                if previous.is_some() {
                    output.push('\n');
                }
                let label = match role {
                    Role::User => "you",
                    Role::Assistant => "agent",
                };
                output.push_str(&format!(
                    "[{}] {}: {}",
                    entry.timestamp.format("%H:%M:%S"),
                    label,
                    entry.text
                ));
            }
        }
        previous = Some(entry.role);
    }

    if !output.is_empty() {
        output.push('\n');
    }
    output
}

/// Format an error for the user, with guidance when it is a recognised
/// agent failure
pub fn format_error(error: &ChatError) -> String {
    match error {
        ChatError::Invocation(invocation) => match invocation.guidance() {
            Some(guidance) => format!("{}\n{}", invocation, guidance),
            None => format!("Agent invocation failed: {}", invocation),
        },
        other => other.to_string(),
    }
}
