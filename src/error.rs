// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for agentchat
//!
//! This module defines all error types used throughout the application.

use std::fmt;

use thiserror::Error;

/// Service error code reported when a dependency of the agent (for example
/// the knowledge base's backing database) failed.
pub const DEPENDENCY_FAILED_CODE: &str = "dependencyFailedException";

/// Service error code reported when the model behind the agent is throttled.
pub const THROTTLING_CODE: &str = "throttlingException";

/// Main error type for agentchat operations
#[derive(Error, Debug)]
pub enum ChatError {
    /// The remote agent invocation failed
    #[error("Agent invocation failed: {0}")]
    Invocation(#[from] AgentInvocationError),

    /// An answer chunk could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error raised by an agent gateway, either when the invocation is
/// rejected or while its event stream is being read.
///
/// The display form embeds the service error code ahead of the message
/// (`throttlingException: Rate exceeded`), which is what invocation
/// error classification inspects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    /// Service error code or name, if the service reported one
    pub code: Option<String>,
    /// Human-readable message
    pub message: String,
}

impl TransportError {
    /// Create an error carrying a service error code
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Create an error with no service error code (socket failures and the like)
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{}: {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for TransportError {}

/// Classification of a failed agent invocation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentInvocationError {
    /// A dependency of the agent failed (typically a sleeping knowledge base database)
    #[error("a dependency of the agent failed")]
    DependencyFailed,

    /// The model behind the agent is throttled
    #[error("the agent's model is throttled")]
    Throttled,

    /// Anything else; carries the original error unchanged
    #[error("{0}")]
    Unknown(TransportError),
}

impl AgentInvocationError {
    /// Classify a transport error by the service error code embedded in it.
    pub fn classify(error: TransportError) -> Self {
        let rendered = error.to_string();
        if rendered.contains(DEPENDENCY_FAILED_CODE) {
            AgentInvocationError::DependencyFailed
        } else if rendered.contains(THROTTLING_CODE) {
            AgentInvocationError::Throttled
        } else {
            AgentInvocationError::Unknown(error)
        }
    }

    /// Actionable guidance for the user, for classified failures only.
    ///
    /// `Unknown` has none: the caller is expected to report it generically.
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            AgentInvocationError::DependencyFailed => Some(
                "The knowledge base database appears to have been asleep. \
                 Wait a few seconds, then send your question again.",
            ),
            AgentInvocationError::Throttled => Some(
                "The model is under heavy load. Wait a minute, then send your question again. \
                 If this keeps happening, switch the agent to another model or request a \
                 service quota increase.",
            ),
            AgentInvocationError::Unknown(_) => None,
        }
    }

    /// Whether this failure was recognised
    pub fn is_classified(&self) -> bool {
        !matches!(self, AgentInvocationError::Unknown(_))
    }
}

/// Malformed answer chunk payload. Fatal for the current turn.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The payload bytes are not valid UTF-8
    #[error("answer chunk is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    /// The payload is not a byte sequence
    #[error("answer chunk bytes are malformed: {0}")]
    InvalidBytes(String),
}

/// Result type alias for agentchat operations
pub type Result<T> = std::result::Result<T, ChatError>;
