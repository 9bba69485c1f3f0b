//! Search-augmented chat family

use std::time::Duration;

use async_trait::async_trait;
use conduit_config::VendorConfig;
use conduit_routing::Backend;
use reqwest::Client;

use super::{BackendAdapter, endpoint_url, post_chat};
use crate::error::{AdapterError, BackendFailure};
use crate::prompt::single_turn;
use crate::protocol::openai::OpenAiRequest;
use crate::types::{Completion, DispatchContext};

const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const VENDOR: &str = "perplexity";

/// Adapter for the web-search backend
///
/// Sends the query as a single user turn; history and sampling settings are
/// left to the vendor.
#[derive(Debug)]
pub struct SearchChatAdapter {
    client: Client,
    config: Option<VendorConfig>,
}

impl SearchChatAdapter {
    pub const fn new(client: Client, config: Option<VendorConfig>) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl BackendAdapter for SearchChatAdapter {
    async fn generate(&self, backend: Backend, prompt: &str, _ctx: &DispatchContext) -> Result<Completion, AdapterError> {
        let config = self
            .config
            .as_ref()
            .ok_or(AdapterError::at(VENDOR, BackendFailure::NotConfigured(VENDOR)))?;
        let base = config.base_url.as_ref().map_or(DEFAULT_BASE_URL, url::Url::as_str);

        let request = OpenAiRequest {
            model: backend.model().to_owned(),
            messages: single_turn(prompt),
            temperature: None,
            max_tokens: None,
        };

        let reply = post_chat(
            &self.client,
            &endpoint_url(base, "chat/completions"),
            config.api_key.as_ref(),
            &request,
            config.timeout().unwrap_or(DEFAULT_TIMEOUT),
        )
        .await
        .map_err(|cause| AdapterError::at(VENDOR, cause))?;

        Ok(Completion {
            text: reply.text,
            usage: reply.usage,
            endpoint: VENDOR,
            fallback_from: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_search_vendor_fails_fast() {
        let adapter = SearchChatAdapter::new(Client::new(), None);

        let err = adapter
            .generate(Backend::Perplexity, "latest news", &DispatchContext::default())
            .await
            .unwrap_err();

        assert_eq!(err.endpoint, Some(VENDOR));
        assert!(matches!(err.cause, BackendFailure::NotConfigured(VENDOR)));
    }
}
