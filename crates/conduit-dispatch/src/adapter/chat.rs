//! Chat-completions family: every OpenAI-compatible cloud vendor

use std::time::Duration;

use async_trait::async_trait;
use conduit_config::{GenerationConfig, VendorsConfig};
use conduit_routing::{Backend, Vendor};
use reqwest::Client;

use super::{BackendAdapter, endpoint_url, post_chat};
use crate::error::{AdapterError, BackendFailure};
use crate::prompt::chat_messages;
use crate::protocol::openai::OpenAiRequest;
use crate::types::{Completion, DispatchContext};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const REASONING_TIMEOUT: Duration = Duration::from_secs(120);

/// Public API base for vendors that have one
const fn default_base_url(vendor: Vendor) -> Option<&'static str> {
    match vendor {
        Vendor::OpenAi => Some("https://api.openai.com/v1"),
        Vendor::Anthropic => Some("https://api.anthropic.com/v1"),
        Vendor::Zhipu => Some("https://open.bigmodel.cn/api/paas/v4"),
        Vendor::DeepSeek => Some("https://api.deepseek.com"),
        // Perplexity is served by the search adapter
        Vendor::Local | Vendor::Oss | Vendor::Perplexity => None,
    }
}

/// Per-call deadline when the vendor section does not set one
const fn default_timeout(backend: Backend) -> Duration {
    match backend {
        Backend::Gpt5 | Backend::ClaudeReasoning | Backend::DeepSeekR1 => REASONING_TIMEOUT,
        _ => DEFAULT_TIMEOUT,
    }
}

/// Adapter for role-tagged chat completion backends
#[derive(Debug)]
pub struct ChatCompletionsAdapter {
    client: Client,
    vendors: VendorsConfig,
    generation: GenerationConfig,
}

impl ChatCompletionsAdapter {
    pub const fn new(client: Client, vendors: VendorsConfig, generation: GenerationConfig) -> Self {
        Self {
            client,
            vendors,
            generation,
        }
    }

    async fn complete(
        &self,
        backend: Backend,
        vendor: &'static str,
        prompt: &str,
        ctx: &DispatchContext,
    ) -> Result<Completion, BackendFailure> {
        let config = self.vendors.get(vendor).ok_or(BackendFailure::NotConfigured(vendor))?;
        let base = config
            .base_url
            .as_ref()
            .map(url::Url::as_str)
            .or_else(|| default_base_url(backend.vendor()))
            .ok_or(BackendFailure::NotConfigured(vendor))?;

        let request = OpenAiRequest {
            model: backend.model().to_owned(),
            messages: chat_messages(
                &self.generation.system_prompt,
                &ctx.history,
                self.generation.history_messages,
                prompt,
            ),
            temperature: Some(self.generation.temperature),
            max_tokens: Some(self.generation.max_tokens),
        };
        let timeout = config.timeout().unwrap_or_else(|| default_timeout(backend));

        let reply = post_chat(
            &self.client,
            &endpoint_url(base, "chat/completions"),
            config.api_key.as_ref(),
            &request,
            timeout,
        )
        .await?;

        Ok(Completion {
            text: reply.text,
            usage: reply.usage,
            endpoint: vendor,
            fallback_from: None,
        })
    }
}

#[async_trait]
impl BackendAdapter for ChatCompletionsAdapter {
    async fn generate(&self, backend: Backend, prompt: &str, ctx: &DispatchContext) -> Result<Completion, AdapterError> {
        let vendor = backend.vendor().as_str();
        self.complete(backend, vendor, prompt, ctx)
            .await
            .map_err(|cause| AdapterError::at(vendor, cause))
    }
}
