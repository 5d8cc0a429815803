//! Shared test utilities and fixtures
//!
//! Mock LLM servers and a scripted stand-in for the terminal picker.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wordwalk_engine::{CandidatePool, Selection, WordSelector};
use wordwalk_providers::retry::RetryConfig;
use wordwalk_providers::{ApiConfig, LlmWordProvider};
use wordwalk_types::{ApiKey, Provider};

fn chat_completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1_234_567_890,
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 30, "completion_tokens": 20, "total_tokens": 50 }
    })
}

fn claude_message(content: &str) -> Value {
    json!({
        "id": "msg_test",
        "type": "message",
        "role": "assistant",
        "content": [{ "type": "text", "text": content }],
        "model": "claude-haiku-4-5-20251001",
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 30, "output_tokens": 20 }
    })
}

/// Answers the Chat Completions query about `seed` with `answer`.
pub async fn mount_openai_words(server: &MockServer, seed: &str, answer: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains(format!("'{seed}'")))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion(answer)))
        .mount(server)
        .await;
}

/// Answers the Messages API query about `seed` with `answer`.
pub async fn mount_claude_words(server: &MockServer, seed: &str, answer: &str) {
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_string_contains(format!("'{seed}'")))
        .respond_with(ResponseTemplate::new(200).set_body_json(claude_message(answer)))
        .mount(server)
        .await;
}

pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_retries: 1,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(2),
        jitter_factor: 0.0,
    }
}

/// A provider pointed at `server`, over plain HTTP.
pub fn provider_for(server: &MockServer, provider: Provider) -> LlmWordProvider {
    let config = ApiConfig::new(ApiKey::new(provider, "test-key"), provider.default_model())
        .expect("key and model share a provider")
        .with_base_url(server.uri());
    LlmWordProvider::new(config)
        .with_client(reqwest::Client::new())
        .with_retry_config(fast_retry())
}

/// Marks the pool words listed for each round, in order. Records every pool
/// it is shown.
#[derive(Debug, Default)]
pub struct ScriptedSelector {
    script: VecDeque<Vec<String>>,
    pub pools: Vec<Vec<String>>,
}

impl ScriptedSelector {
    pub fn new(rounds: &[&[&str]]) -> Self {
        Self {
            script: rounds
                .iter()
                .map(|round| round.iter().map(|w| (*w).to_string()).collect())
                .collect(),
            pools: Vec::new(),
        }
    }
}

impl WordSelector for ScriptedSelector {
    async fn select(&mut self, pool: &CandidatePool, _round: usize) -> anyhow::Result<Selection> {
        self.pools
            .push(pool.iter().map(ToString::to_string).collect());
        let wanted = self.script.pop_front().unwrap_or_default();
        let marked: Vec<bool> = pool
            .iter()
            .map(|word| wanted.iter().any(|w| w.eq_ignore_ascii_case(word.as_str())))
            .collect();
        Ok(Selection::from_marked(pool, &marked))
    }
}
