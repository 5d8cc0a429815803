//! Configuration file to provider wiring.

use std::io::Write;

use wiremock::MockServer;

use wordwalk_engine::{LlmWordProvider, RelatedWordProvider, WordwalkConfig, resolve_provider};
use wordwalk_types::{Provider, Word};

use crate::common::{fast_retry, mount_claude_words};

fn config_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn provider_aliases_resolve() {
    assert_eq!(resolve_provider(None, Some("Anthropic")).unwrap(), Provider::Claude);
    assert_eq!(resolve_provider(None, Some("chatgpt")).unwrap(), Provider::OpenAI);
    assert_eq!(resolve_provider(Some("gpt"), Some("claude")).unwrap(), Provider::OpenAI);

    let err = resolve_provider(None, Some("gemini")).unwrap_err();
    assert_eq!(err.raw(), "gemini");
}

#[tokio::test]
async fn configured_claude_key_reaches_the_api() {
    if std::env::var("WORDWALK_PROVIDER").is_ok() {
        eprintln!("Skipping test: WORDWALK_PROVIDER is set");
        return;
    }

    let file = config_file(
        r#"
[app]
provider = "claude"
max_rounds = 5

[api_keys]
anthropic = "sk-ant-from-config"
"#,
    );
    let config = WordwalkConfig::load_from(file.path()).unwrap().unwrap();
    let api = config.api_config().unwrap().expect("key configured");
    assert_eq!(api.provider(), Provider::Claude);
    assert_eq!(api.model().as_str(), "claude-haiku-4-5-20251001");
    assert_eq!(config.max_rounds().map(std::num::NonZeroUsize::get), Some(5));

    let server = MockServer::start().await;
    mount_claude_words(&server, "forest", "tree, moss, fern").await;
    let provider = LlmWordProvider::new(api.with_base_url(server.uri()))
        .with_client(reqwest::Client::new())
        .with_retry_config(fast_retry());

    let words = provider.related_words(&Word::parse("forest").unwrap()).await;
    let words: Vec<&str> = words.iter().map(Word::as_str).collect();
    assert_eq!(words, ["tree", "moss", "fern"]);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].headers.get("x-api-key").unwrap(),
        "sk-ant-from-config"
    );
}

#[test]
fn malformed_config_is_an_error() {
    let file = config_file("[api_keys\nopenai = 1");
    let err = WordwalkConfig::load_from(file.path()).unwrap_err();
    assert!(err.to_string().contains("failed to parse config"));
}
