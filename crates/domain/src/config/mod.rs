mod llm;
mod observability;
mod session;

pub use llm::*;
pub use observability::*;
pub use session::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl ConfigError {
    fn error(field: &str, message: &str) -> Self {
        Self {
            severity: ConfigSeverity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: &str, message: &str) -> Self {
        Self {
            severity: ConfigSeverity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.session.persona.trim().is_empty() {
            errors.push(ConfigError::warning(
                "session.persona",
                "no persona instruction configured; requests carry user text only",
            ));
        }

        // The fallback becomes an ASSISTANT turn, which must be non-blank.
        if self.session.fallback_text.trim().is_empty() {
            errors.push(ConfigError::error(
                "session.fallback_text",
                "fallback text must not be empty",
            ));
        }

        if let Some(greeting) = &self.session.greeting {
            if greeting.trim().is_empty() {
                errors.push(ConfigError::error(
                    "session.greeting",
                    "greeting must not be blank (omit it to start empty)",
                ));
            }
        }

        if self.generation.max_output_tokens == 0 {
            errors.push(ConfigError::error(
                "generation.max_output_tokens",
                "max_output_tokens must be greater than 0",
            ));
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            errors.push(ConfigError::error(
                "generation.temperature",
                "temperature must be within 0.0 and 2.0",
            ));
        }

        if self.provider.base_url.is_empty() {
            errors.push(ConfigError::error(
                "provider.base_url",
                "base_url must not be empty",
            ));
        }

        if self.provider.model.is_empty() {
            errors.push(ConfigError::error(
                "provider.model",
                "model must not be empty",
            ));
        }

        if self.provider.auth.key.is_none() && self.provider.auth.env.is_none() {
            errors.push(ConfigError::warning(
                "provider.auth",
                "no API key source configured (set 'env' or 'key')",
            ));
        }

        errors
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tests
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
