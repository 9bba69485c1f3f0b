//! One adapter per backend protocol family

pub mod chat;
pub mod local;
pub mod search;

use std::time::Duration;

use async_trait::async_trait;
use conduit_routing::Backend;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

pub use self::chat::ChatCompletionsAdapter;
pub use self::local::{LocalGenerateAdapter, LocalModels};
pub use self::search::SearchChatAdapter;
use crate::error::{AdapterError, BackendFailure};
use crate::protocol::openai::{OpenAiRequest, OpenAiResponse};
use crate::types::{Completion, DispatchContext, TokenUsage};

/// Uniform generation capability implemented by each protocol family
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Produce a completion from `backend` for `prompt`
    ///
    /// Failures carry the endpoint that was called so usage can be
    /// attributed to the engine or vendor that actually failed.
    async fn generate(&self, backend: Backend, prompt: &str, ctx: &DispatchContext) -> Result<Completion, AdapterError>;
}

/// Join a path onto a configured base URL
pub(crate) fn endpoint_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Reply text and reported usage from an OpenAI-compatible endpoint
#[derive(Debug)]
pub(crate) struct ChatReply {
    pub text: String,
    pub usage: TokenUsage,
}

/// POST a chat completion request and normalize the reply
pub(crate) async fn post_chat(
    client: &Client,
    url: &str,
    api_key: Option<&SecretString>,
    request: &OpenAiRequest,
    timeout: Duration,
) -> Result<ChatReply, BackendFailure> {
    let mut builder = client.post(url).json(request).timeout(timeout);
    if let Some(key) = api_key {
        builder = builder.bearer_auth(key.expose_secret());
    }

    let response = builder
        .send()
        .await
        .map_err(|e| BackendFailure::from_reqwest(&e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(url, status = %status, "backend returned error");
        return Err(BackendFailure::Status { status, body });
    }

    let wire: OpenAiResponse = response
        .json()
        .await
        .map_err(|e| BackendFailure::from_reqwest(&e, timeout))?;

    let text = wire
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| BackendFailure::Decode("response contained no choices".to_owned()))?;

    let usage = wire
        .usage
        .map(|u| TokenUsage::new(u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default();

    Ok(ChatReply { text, usage })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_normalizes_slashes() {
        assert_eq!(
            endpoint_url("https://api.openai.com/v1/", "/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(endpoint_url("http://localhost:11434", "api/generate"), "http://localhost:11434/api/generate");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_failure() {
        let request = OpenAiRequest {
            model: "gpt-4o".to_owned(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
        };

        let err = post_chat(
            &Client::new(),
            "http://127.0.0.1:9/v1/chat/completions",
            None,
            &request,
            Duration::from_secs(2),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, BackendFailure::Transport(_) | BackendFailure::Timeout(_)));
    }
}
