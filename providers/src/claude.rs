//! Anthropic Messages API client.
//!
//! Non-streaming: the answer is a single short line, so the concatenated
//! `text` blocks of the response are returned as-is.

use serde::Deserialize;
use serde_json::{Value, json};
use wordwalk_types::Word;

use crate::words::{SYSTEM_PROMPT, user_prompt};
use crate::{ApiConfig, ProviderError, retry::RetryConfig, send_json};

const MESSAGES_PATH: &str = "/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

pub(crate) fn build_request_body(config: &ApiConfig, word: &Word) -> Value {
    json!({
        "model": config.model().as_str(),
        "max_tokens": config.max_tokens(),
        "temperature": config.temperature(),
        "system": SYSTEM_PROMPT,
        "messages": [
            { "role": "user", "content": user_prompt(word) },
        ],
    })
}

pub async fn complete(
    client: &reqwest::Client,
    config: &ApiConfig,
    retry: &RetryConfig,
    word: &Word,
) -> Result<String, ProviderError> {
    let url = config.endpoint(MESSAGES_PATH);
    let body = build_request_body(config, word);

    let response: MessagesResponse = send_json(
        || {
            client
                .post(&url)
                .header("x-api-key", config.api_key())
                .header("anthropic-version", ANTHROPIC_VERSION)
                .json(&body)
        },
        retry,
    )
    .await?;

    let text: String = response
        .content
        .into_iter()
        .filter_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
        .collect();

    if text.trim().is_empty() {
        return Err(ProviderError::EmptyResponse);
    }
    Ok(text.trim().to_string())
}
