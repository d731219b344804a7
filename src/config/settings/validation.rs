// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use crate::error::{ChatError, Result};

use super::{
    AgentConfig, ENV_AGENT_ALIAS_ID, ENV_AGENT_ENDPOINT, ENV_AGENT_ID, ENV_AGENT_REGION,
    ENV_AWS_REGION,
};

impl AgentConfig {
    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    /// Priority: environment > config file. Blank values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(agent_id) = get(ENV_AGENT_ID) {
            self.agent_id = agent_id;
        }
        if let Some(alias_id) = get(ENV_AGENT_ALIAS_ID) {
            self.agent_alias_id = alias_id;
        }
        if let Some(region) = get(ENV_AGENT_REGION).or_else(|| get(ENV_AWS_REGION)) {
            self.region = region;
        }
        if let Some(endpoint) = get(ENV_AGENT_ENDPOINT) {
            self.endpoint = Some(endpoint);
        }
    }

    /// Check that every required value is present.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("agent_id", ENV_AGENT_ID, &self.agent_id),
            ("agent_alias_id", ENV_AGENT_ALIAS_ID, &self.agent_alias_id),
            ("region", ENV_AGENT_REGION, &self.region),
        ];

        for (key, env, value) in required {
            if value.trim().is_empty() {
                return Err(ChatError::Config(format!(
                    "{} is required (set it in the settings file or via {})",
                    key, env
                )));
            }
        }

        if let Some(endpoint) = &self.endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(ChatError::Config(format!(
                    "endpoint must be an http(s) URL, got '{}'",
                    endpoint
                )));
            }
        }

        Ok(())
    }
}
