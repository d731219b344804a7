// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Agent settings
//!
//! Loaded from ~/.agentchat/settings.json, then overridden by environment
//! variables (a `.env` file in the working directory is honoured by the CLI).
//! The agent id, alias id and region are required and have no defaults.

use serde::{Deserialize, Serialize};

mod io;
mod validation;

/// Environment variable overriding the agent identifier
pub const ENV_AGENT_ID: &str = "AGENT_ID";
/// Environment variable overriding the agent alias identifier
pub const ENV_AGENT_ALIAS_ID: &str = "AGENT_ALIAS_ID";
/// Environment variable overriding the region
pub const ENV_AGENT_REGION: &str = "AGENT_REGION";
/// Fallback environment variable for the region
pub const ENV_AWS_REGION: &str = "AWS_REGION";
/// Environment variable overriding the runtime endpoint
pub const ENV_AGENT_ENDPOINT: &str = "AGENT_ENDPOINT";

/// Identifies the remote agent this client invokes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Agent identifier
    #[serde(default)]
    pub agent_id: String,

    /// Agent alias identifier
    #[serde(default)]
    pub agent_alias_id: String,

    /// Region the agent is deployed in
    #[serde(default)]
    pub region: String,

    /// Runtime endpoint override (derived from the region when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl AgentConfig {
    /// Create a config from its three required values
    pub fn new(
        agent_id: impl Into<String>,
        agent_alias_id: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent_alias_id: agent_alias_id.into(),
            region: region.into(),
            endpoint: None,
        }
    }

    /// Set an explicit runtime endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Base URL of the agent runtime
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-agent-runtime.{}.amazonaws.com", self.region),
        }
    }
}
