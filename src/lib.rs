// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! agentchat - terminal chat client for a remote orchestrating agent.
//!
//! This crate exposes the runtime used by the `agentchat` CLI
//! (`src/main.rs`).
//!
//! Architecture highlights:
//! - `agent`: gateway abstraction over the agent runtime (HTTP and mock)
//! - `chat`: event classification, trace rendering, session transcript
//! - `config`: agent settings file and environment overrides
//! - `cli`: command-line arguments

pub mod agent;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;

pub use error::{ChatError, Result};
