//! LLM provider clients that answer related-word queries.
//!
//! # Architecture
//!
//! - [`RelatedWordProvider`] - the contract the exploration engine depends on:
//!   one word in, a best-effort list of related words out
//! - [`LlmWordProvider`] - the production implementation, dispatching to
//!   [`openai`] (Chat Completions) or [`claude`] (Messages API)
//! - [`retry`] - SDK-style retry with exponential backoff, used by both clients
//! - [`parse_related_words`] - turns the model's comma-separated answer into words
//!
//! # Error Handling
//!
//! Client functions return [`ProviderError`]. [`LlmWordProvider`] absorbs
//! those errors at the trait boundary: a failed query is logged and reported
//! as "no related words", so a flaky network never aborts a round.

pub mod claude;
pub mod openai;
pub mod retry;
mod words;

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use reqwest::StatusCode;
use wordwalk_types::{ApiKey, ModelName, Provider, Word};

pub use words::parse_related_words;
pub use wordwalk_types;

/// Canonical OpenAI API base URL.
pub const OPENAI_API_BASE_URL: &str = "https://api.openai.com";
/// Canonical Anthropic API base URL.
pub const CLAUDE_API_BASE_URL: &str = "https://api.anthropic.com";

const CONNECT_TIMEOUT_SECS: u64 = 10;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_TOKENS: u32 = 100;
const DEFAULT_TEMPERATURE: f32 = 0.7;
const MAX_ERROR_BODY_BYTES: usize = 8 * 1024;

/// Shared hardened client: HTTPS only, no redirects, bounded timeouts.
pub fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .redirect(reqwest::redirect::Policy::none())
            .https_only(true)
            .build()
            .unwrap_or_else(|e| {
                tracing::error!("Failed to build hardened HTTP client: {e}. Using defaults.");
                reqwest::Client::new()
            })
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ApiConfigError {
    #[error("API key provider {key:?} does not match model provider {model:?}")]
    ProviderMismatch { key: Provider, model: Provider },
}

/// Provider + model configuration for related-word queries.
///
/// The constructor enforces that the API key and model belong to the same provider.
///
/// ```rust
/// use wordwalk_providers::ApiConfig;
/// use wordwalk_types::{ApiKey, Provider};
///
/// let config = ApiConfig::new(ApiKey::new(Provider::OpenAI, "test"), Provider::OpenAI.default_model())
///     .unwrap()
///     .with_temperature(0.2);
/// assert_eq!(config.model().as_str(), "gpt-4o");
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    api_key: ApiKey,
    model: ModelName,
    base_url: Option<String>,
    max_tokens: u32,
    temperature: f32,
}

impl ApiConfig {
    pub fn new(api_key: ApiKey, model: ModelName) -> Result<Self, ApiConfigError> {
        let key_provider = api_key.provider();
        let model_provider = model.provider();
        if key_provider != model_provider {
            return Err(ApiConfigError::ProviderMismatch {
                key: key_provider,
                model: model_provider,
            });
        }

        Ok(Self {
            api_key,
            model,
            base_url: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        })
    }

    /// Overrides the API base URL (scheme + host, no trailing path).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn provider(&self) -> Provider {
        self.api_key.provider()
    }

    #[must_use]
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    #[must_use]
    pub fn model(&self) -> &ModelName {
        &self.model
    }

    #[must_use]
    pub const fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    #[must_use]
    pub const fn temperature(&self) -> f32 {
        self.temperature
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.as_deref().unwrap_or(match self.provider() {
            Provider::OpenAI => OPENAI_API_BASE_URL,
            Provider::Claude => CLAUDE_API_BASE_URL,
        });
        format!("{}{path}", base.trim_end_matches('/'))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no API key configured for {0}")]
    MissingApiKey(Provider),
    #[error("request failed after {attempts} attempts: {source}")]
    Connection {
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },
    #[error("API error {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("failed to decode response: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("response contained no text")]
    EmptyResponse,
}

async fn read_capped_error_body(response: reqwest::Response) -> String {
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY_BYTES {
        let mut end = MAX_ERROR_BODY_BYTES;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        body.truncate(end);
        body.push_str("...(truncated)");
    }
    body
}

/// Sends a JSON request with retries and decodes a successful body as `T`.
pub(crate) async fn send_json<T, F>(
    build_request: F,
    retry_config: &retry::RetryConfig,
) -> Result<T, ProviderError>
where
    T: serde::de::DeserializeOwned,
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = match retry::send_with_retry(build_request, retry_config).await {
        retry::RetryOutcome::Success(response) => response,
        retry::RetryOutcome::HttpError(response) => {
            let status = response.status();
            let body = read_capped_error_body(response).await;
            return Err(ProviderError::Status { status, body });
        }
        retry::RetryOutcome::ConnectionError { attempts, source } => {
            return Err(ProviderError::Connection { attempts, source });
        }
    };

    response.json::<T>().await.map_err(ProviderError::Decode)
}

/// Source of words related to a seed word.
///
/// Implementations are best effort: any failure is reported as an empty list
/// and must not abort the caller.
pub trait RelatedWordProvider {
    fn related_words(&self, word: &Word) -> impl Future<Output = Vec<Word>>;
}

impl<P: RelatedWordProvider + ?Sized> RelatedWordProvider for &P {
    fn related_words(&self, word: &Word) -> impl Future<Output = Vec<Word>> {
        (**self).related_words(word)
    }
}

/// [`RelatedWordProvider`] backed by an LLM API.
#[derive(Debug, Clone)]
pub struct LlmWordProvider {
    provider: Provider,
    config: Option<ApiConfig>,
    client: reqwest::Client,
    retry: retry::RetryConfig,
}

impl LlmWordProvider {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            provider: config.provider(),
            config: Some(config),
            client: http_client().clone(),
            retry: retry::RetryConfig::default(),
        }
    }

    /// A provider without credentials. Every query fails with
    /// [`ProviderError::MissingApiKey`] and yields no words.
    #[must_use]
    pub fn unconfigured(provider: Provider) -> Self {
        Self {
            provider,
            config: None,
            client: http_client().clone(),
            retry: retry::RetryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry: retry::RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Queries the configured API once and parses the answer.
    pub async fn fetch_related_words(&self, word: &Word) -> Result<Vec<Word>, ProviderError> {
        let config = self
            .config
            .as_ref()
            .ok_or(ProviderError::MissingApiKey(self.provider))?;

        let text = match config.provider() {
            Provider::OpenAI => openai::complete(&self.client, config, &self.retry, word).await?,
            Provider::Claude => claude::complete(&self.client, config, &self.retry, word).await?,
        };

        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(parse_related_words(&text))
    }
}

impl RelatedWordProvider for LlmWordProvider {
    async fn related_words(&self, word: &Word) -> Vec<Word> {
        match self.fetch_related_words(word).await {
            Ok(words) => {
                tracing::debug!(%word, count = words.len(), "Related words received");
                words
            }
            Err(e) => {
                tracing::warn!(%word, error = %e, "Related word query failed");
                Vec::new()
            }
        }
    }
}
