//! Provider enumeration, model names and API keys.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    OpenAI,
    Claude,
}

const PROVIDER_PARSE_VALUES: &[&str] = &["openai", "gpt", "chatgpt", "claude", "anthropic"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid provider '{raw}'; expected one of: {expected:?}")]
pub struct ProviderParseError {
    raw: String,
    expected: &'static [&'static str],
}

impl ProviderParseError {
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl Provider {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Claude => "claude",
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAI => "GPT",
            Provider::Claude => "Claude",
        }
    }

    #[must_use]
    pub fn env_var(&self) -> &'static str {
        match self {
            Provider::OpenAI => "OPENAI_API_KEY",
            Provider::Claude => "ANTHROPIC_API_KEY",
        }
    }

    #[must_use]
    pub fn default_model(&self) -> ModelName {
        match self {
            Provider::OpenAI => ModelName::from_predefined(PredefinedModel::Gpt4o),
            Provider::Claude => ModelName::from_predefined(PredefinedModel::ClaudeHaiku),
        }
    }

    pub fn parse(s: &str) -> Result<Self, ProviderParseError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" | "gpt" | "chatgpt" => Ok(Provider::OpenAI),
            "claude" | "anthropic" => Ok(Provider::Claude),
            _ => Err(ProviderParseError {
                raw: s.trim().to_string(),
                expected: PROVIDER_PARSE_VALUES,
            }),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Models known to answer the related-words prompt well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredefinedModel {
    Gpt4o,
    Gpt4oMini,
    ClaudeHaiku,
    ClaudeSonnet,
}

impl PredefinedModel {
    #[must_use]
    pub const fn all() -> &'static [PredefinedModel] {
        &[
            PredefinedModel::Gpt4o,
            PredefinedModel::Gpt4oMini,
            PredefinedModel::ClaudeHaiku,
            PredefinedModel::ClaudeSonnet,
        ]
    }

    #[must_use]
    pub const fn model_id(self) -> &'static str {
        match self {
            PredefinedModel::Gpt4o => "gpt-4o",
            PredefinedModel::Gpt4oMini => "gpt-4o-mini",
            PredefinedModel::ClaudeHaiku => "claude-haiku-4-5-20251001",
            PredefinedModel::ClaudeSonnet => "claude-sonnet-4-6",
        }
    }

    #[must_use]
    pub const fn provider(self) -> Provider {
        match self {
            PredefinedModel::Gpt4o | PredefinedModel::Gpt4oMini => Provider::OpenAI,
            PredefinedModel::ClaudeHaiku | PredefinedModel::ClaudeSonnet => Provider::Claude,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelParseError {
    #[error("model name cannot be empty")]
    EmptyInput,
    #[error("Claude model must start with claude- (got {0})")]
    ClaudePrefix(String),
    #[error("OpenAI model must start with gpt- (got {0})")]
    OpenAIPrefix(String),
}

/// A model id paired with the provider that serves it.
///
/// Unknown ids are accepted as long as the prefix matches the provider, so
/// newer models work without a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelName {
    provider: Provider,
    name: Cow<'static, str>,
}

impl ModelName {
    pub fn parse(provider: Provider, raw: &str) -> Result<Self, ModelParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelParseError::EmptyInput);
        }

        if let Some(model) = PredefinedModel::all()
            .iter()
            .copied()
            .find(|m| m.provider() == provider && m.model_id().eq_ignore_ascii_case(trimmed))
        {
            return Ok(Self::from_predefined(model));
        }

        let lower = trimmed.to_ascii_lowercase();
        match provider {
            Provider::Claude if !lower.starts_with("claude-") => {
                Err(ModelParseError::ClaudePrefix(trimmed.to_string()))
            }
            Provider::OpenAI if !lower.starts_with("gpt-") => {
                Err(ModelParseError::OpenAIPrefix(trimmed.to_string()))
            }
            _ => Ok(Self {
                provider,
                name: Cow::Owned(trimmed.to_string()),
            }),
        }
    }

    #[must_use]
    pub const fn from_predefined(model: PredefinedModel) -> Self {
        Self {
            provider: model.provider(),
            name: Cow::Borrowed(model.model_id()),
        }
    }

    #[must_use]
    pub const fn provider(&self) -> Provider {
        self.provider
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.name.as_ref()
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name.fmt(f)
    }
}

/// API key tagged with its provider.
///
/// `Debug` is manually implemented to redact the key value.
#[derive(Clone)]
pub enum ApiKey {
    OpenAI(String),
    Claude(String),
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiKey::OpenAI(_) => write!(f, "ApiKey::OpenAI(<redacted>)"),
            ApiKey::Claude(_) => write!(f, "ApiKey::Claude(<redacted>)"),
        }
    }
}

impl ApiKey {
    #[must_use]
    pub fn new(provider: Provider, key: impl Into<String>) -> Self {
        match provider {
            Provider::OpenAI => ApiKey::OpenAI(key.into()),
            Provider::Claude => ApiKey::Claude(key.into()),
        }
    }

    #[must_use]
    pub fn provider(&self) -> Provider {
        match self {
            ApiKey::OpenAI(_) => Provider::OpenAI,
            ApiKey::Claude(_) => Provider::Claude,
        }
    }

    #[must_use]
    pub fn expose_secret(&self) -> &str {
        match self {
            ApiKey::OpenAI(key) | ApiKey::Claude(key) => key,
        }
    }
}
