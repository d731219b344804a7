// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Chat session management
//!
//! This module turns the agent's raw event stream into displayable units:
//! event classification, trace rendering, the session transcript, and the
//! per-turn stream that ties them together.

pub mod classifier;
pub mod display;
pub mod event;
pub mod render;
pub mod session;
pub mod streaming;

pub use classifier::classify;
pub use event::{ClassifiedEvent, ObservationKind, ToolKind, TraceEvent, TraceKind};
pub use render::{render, render_all, RenderableUnit, UnitBody, UnitKind};
pub use session::{ChatSession, Role, Session, TranscriptEntry};
pub use streaming::{ResponseConsumer, StreamStats, UnitStream};
