//! Optional TOML configuration at `~/.wordwalk/config.toml`.
//!
//! ```toml
//! [app]
//! provider = "openai"   # or "claude"
//! model = "gpt-4o"
//! ascii_only = false
//! high_contrast = false
//! max_rounds = 0        # 0 = no limit
//!
//! [api_keys]
//! openai = "${OPENAI_API_KEY}"
//! anthropic = "${ANTHROPIC_API_KEY}"
//! ```
//!
//! Every section is optional; a missing file means defaults.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;
use wordwalk_providers::{ApiConfig, ApiConfigError};
use wordwalk_types::{ApiKey, ModelName, ModelParseError, Provider, ProviderParseError, UiOptions};

/// Environment variable that overrides `[app] provider`.
pub const PROVIDER_ENV_VAR: &str = "WORDWALK_PROVIDER";

#[derive(Debug, Default, Deserialize)]
pub struct WordwalkConfig {
    pub app: Option<AppConfig>,
    pub api_keys: Option<ApiKeys>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    pub provider: Option<String>,
    pub model: Option<String>,
    /// Use ASCII-only glyphs for checkboxes and markers.
    #[serde(default)]
    pub ascii_only: bool,
    /// Enable a high-contrast color palette.
    #[serde(default)]
    pub high_contrast: bool,
    pub max_rounds: Option<usize>,
}

#[derive(Default, Deserialize)]
pub struct ApiKeys {
    pub openai: Option<String>,
    pub anthropic: Option<String>,
}

// Manual Debug impl to prevent leaking API keys in logs.
impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn mask(opt: Option<&String>) -> &'static str {
            if opt.is_some() { "[REDACTED]" } else { "None" }
        }
        f.debug_struct("ApiKeys")
            .field("openai", &mask(self.openai.as_ref()))
            .field("anthropic", &mask(self.anthropic.as_ref()))
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Provider(#[from] ProviderParseError),
    #[error(transparent)]
    Model(#[from] ModelParseError),
    #[error(transparent)]
    ApiConfig(#[from] ApiConfigError),
}

/// Replaces `${VAR}` references with the variable's value (empty if unset).
/// An unclosed `${` is kept verbatim.
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start + 2..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let name = &rest[start + 2..start + 2 + len];
        if !name.is_empty() {
            out.push_str(&env::var(name).unwrap_or_default());
        }
        rest = &rest[start + 2 + len + 1..];
    }

    out.push_str(rest);
    out
}

/// Picks the provider: environment override, then config, then the default.
pub fn resolve_provider(
    env_value: Option<&str>,
    configured: Option<&str>,
) -> Result<Provider, ProviderParseError> {
    match env_value.filter(|v| !v.trim().is_empty()).or(configured) {
        Some(raw) => Provider::parse(raw),
        None => Ok(Provider::default()),
    }
}

/// Parses the configured model for `provider`. When `overridden` is set the
/// provider came from `WORDWALK_PROVIDER` and differs from the configured one,
/// so a model belonging to the configured provider falls back to the
/// provider's default.
pub fn resolve_model(
    provider: Provider,
    configured: Option<&str>,
    overridden: bool,
) -> Result<ModelName, ModelParseError> {
    let Some(raw) = configured else {
        return Ok(provider.default_model());
    };
    match ModelName::parse(provider, raw) {
        Ok(model) => Ok(model),
        Err(err) if overridden => {
            let fallback = provider.default_model();
            tracing::warn!(
                %provider,
                configured = raw,
                fallback = %fallback,
                "Configured model does not fit {PROVIDER_ENV_VAR} override: {err}"
            );
            Ok(fallback)
        }
        Err(err) => Err(err),
    }
}

/// Picks the API key: a non-empty configured value (after `${VAR}`
/// expansion), otherwise the provider's standard environment variable.
pub fn resolve_api_key(
    provider: Provider,
    configured: Option<&str>,
    env_value: Option<String>,
) -> Option<ApiKey> {
    configured
        .map(expand_env_vars)
        .filter(|key| !key.trim().is_empty())
        .or_else(|| env_value.filter(|key| !key.trim().is_empty()))
        .map(|key| ApiKey::new(provider, key.trim()))
}

impl WordwalkConfig {
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|source| {
            tracing::warn!("Failed to read config at {:?}: {}", path, source);
            ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;

        toml::from_str(&content).map(Some).map_err(|source| {
            tracing::warn!("Failed to parse config at {:?}: {}", path, source);
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    #[must_use]
    pub fn ui_options(&self) -> UiOptions {
        self.app
            .as_ref()
            .map(|app| UiOptions {
                ascii_only: app.ascii_only,
                high_contrast: app.high_contrast,
            })
            .unwrap_or_default()
    }

    /// Round limit; `None` (or a configured 0) means unbounded.
    #[must_use]
    pub fn max_rounds(&self) -> Option<NonZeroUsize> {
        self.app
            .as_ref()
            .and_then(|app| app.max_rounds)
            .and_then(NonZeroUsize::new)
    }

    pub fn provider(&self) -> Result<Provider, ConfigError> {
        let env_value = env::var(PROVIDER_ENV_VAR).ok();
        let configured = self.app.as_ref().and_then(|app| app.provider.as_deref());
        Ok(resolve_provider(env_value.as_deref(), configured)?)
    }

    pub fn model(&self, provider: Provider) -> Result<ModelName, ConfigError> {
        let app = self.app.as_ref();
        let configured_provider = app.and_then(|app| app.provider.as_deref());
        let overridden = env::var(PROVIDER_ENV_VAR).is_ok_and(|v| !v.trim().is_empty())
            && resolve_provider(None, configured_provider).ok() != Some(provider);
        let configured = app.and_then(|app| app.model.as_deref());
        Ok(resolve_model(provider, configured, overridden)?)
    }

    #[must_use]
    pub fn api_key(&self, provider: Provider) -> Option<ApiKey> {
        let configured = self.api_keys.as_ref().and_then(|keys| match provider {
            Provider::OpenAI => keys.openai.as_deref(),
            Provider::Claude => keys.anthropic.as_deref(),
        });
        resolve_api_key(provider, configured, env::var(provider.env_var()).ok())
    }

    /// Full provider configuration, or `Ok(None)` when no API key is available.
    pub fn api_config(&self) -> Result<Option<ApiConfig>, ConfigError> {
        let provider = self.provider()?;
        let model = self.model(provider)?;
        let Some(key) = self.api_key(provider) else {
            tracing::warn!(%provider, env_var = provider.env_var(), "No API key configured");
            return Ok(None);
        };
        Ok(Some(ApiConfig::new(key, model)?))
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".wordwalk").join("config.toml"))
}
