//! OpenAI Chat Completions client.
//!
//! Sends one non-streaming request per seed word to `/v1/chat/completions`
//! and returns the text of the first choice.

use serde::Deserialize;
use serde_json::{Value, json};
use wordwalk_types::Word;

use crate::words::{SYSTEM_PROMPT, user_prompt};
use crate::{ApiConfig, ProviderError, retry::RetryConfig, send_json};

const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

pub(crate) fn build_request_body(config: &ApiConfig, word: &Word) -> Value {
    json!({
        "model": config.model().as_str(),
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": user_prompt(word) },
        ],
        "max_tokens": config.max_tokens(),
        "temperature": config.temperature(),
    })
}

/// Asks the model for words related to `word` and returns its raw answer.
pub async fn complete(
    client: &reqwest::Client,
    config: &ApiConfig,
    retry: &RetryConfig,
    word: &Word,
) -> Result<String, ProviderError> {
    let url = config.endpoint(CHAT_COMPLETIONS_PATH);
    let body = build_request_body(config, word);

    let completion: ChatCompletion = send_json(
        || {
            client
                .post(&url)
                .bearer_auth(config.api_key())
                .json(&body)
        },
        retry,
    )
    .await?;

    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .ok_or(ProviderError::EmptyResponse)
}
