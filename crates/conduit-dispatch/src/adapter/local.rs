//! Local-generate family: Ollama with LM Studio as an interchangeable engine

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use conduit_config::{GenerationConfig, LocalConfig, PreferredEngine};
use conduit_routing::Backend;
use reqwest::Client;
use serde::Serialize;

use super::{BackendAdapter, endpoint_url, post_chat};
use crate::error::{AdapterError, BackendFailure};
use crate::health::EngineStatus;
use crate::probe::AvailabilityCache;
use crate::prompt::{compose_local_prompt, single_turn};
use crate::protocol::ollama::{OllamaGenerateRequest, OllamaGenerateResponse, OllamaOptions, OllamaTags};
use crate::protocol::openai::{OpenAiModelList, OpenAiRequest};
use crate::retrieval::{Retriever, fetch_context};
use crate::types::{Completion, DispatchContext, FailedAttempt, TokenUsage};

pub(crate) const OLLAMA: &str = "ollama";
pub(crate) const LM_STUDIO: &str = "lm_studio";

/// A self-hosted inference engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Engine {
    Ollama,
    LmStudio,
}

impl Engine {
    const fn label(self) -> &'static str {
        match self {
            Self::Ollama => OLLAMA,
            Self::LmStudio => LM_STUDIO,
        }
    }
}

/// Models installed on each local engine
#[derive(Debug, Clone, Default, Serialize)]
pub struct LocalModels {
    pub ollama: Vec<String>,
    pub lm_studio: Vec<String>,
}

/// Adapter for the zero-cost local backends
pub struct LocalGenerateAdapter {
    client: Client,
    config: LocalConfig,
    generation: GenerationConfig,
    probes: AvailabilityCache,
    retriever: Arc<dyn Retriever>,
}

impl LocalGenerateAdapter {
    pub fn new(
        client: Client,
        config: LocalConfig,
        generation: GenerationConfig,
        retriever: Arc<dyn Retriever>,
    ) -> Self {
        let probes = AvailabilityCache::new(client.clone(), config.probe_ttl(), config.probe_timeout());

        Self {
            client,
            config,
            generation,
            probes,
            retriever,
        }
    }

    fn ollama_url(&self, path: &str) -> String {
        endpoint_url(self.config.ollama_url.as_str(), path)
    }

    fn lm_studio_url(&self, path: &str) -> String {
        endpoint_url(self.config.lm_studio_url.as_str(), path)
    }

    fn probe_url(&self, engine: Engine) -> String {
        match engine {
            Engine::Ollama => self.ollama_url("api/tags"),
            Engine::LmStudio => self.lm_studio_url("v1/models"),
        }
    }

    /// Pick the engine for the next call
    async fn select_engine(&self) -> Result<Engine, BackendFailure> {
        match self.config.preferred {
            PreferredEngine::Ollama => Ok(Engine::Ollama),
            PreferredEngine::LmStudio => Ok(Engine::LmStudio),
            PreferredEngine::Auto => {
                if self.probes.is_available(&self.probe_url(Engine::LmStudio)).await {
                    Ok(Engine::LmStudio)
                } else if self.probes.is_available(&self.probe_url(Engine::Ollama)).await {
                    Ok(Engine::Ollama)
                } else {
                    Err(BackendFailure::NoLocalEngine)
                }
            }
        }
    }

    async fn call_ollama(&self, backend: Backend, prompt: &str) -> Result<Completion, BackendFailure> {
        let timeout = self.config.timeout();
        let request = OllamaGenerateRequest {
            model: backend.model().to_owned(),
            prompt: prompt.to_owned(),
            stream: false,
            options: OllamaOptions {
                temperature: self.generation.temperature,
                num_predict: self.generation.max_tokens,
            },
        };

        let response = self
            .client
            .post(self.ollama_url("api/generate"))
            .json(&request)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| BackendFailure::from_reqwest(&e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendFailure::Status { status, body });
        }

        let wire: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| BackendFailure::from_reqwest(&e, timeout))?;

        Ok(Completion {
            text: wire.response,
            usage: TokenUsage::new(wire.prompt_eval_count, wire.eval_count),
            endpoint: OLLAMA,
            fallback_from: None,
        })
    }

    async fn call_lm_studio(&self, backend: Backend, prompt: &str) -> Result<Completion, BackendFailure> {
        let request = OpenAiRequest {
            model: backend.model().to_owned(),
            messages: single_turn(prompt),
            temperature: Some(self.generation.temperature),
            max_tokens: Some(self.generation.max_tokens),
        };

        let reply = post_chat(
            &self.client,
            &self.lm_studio_url("v1/chat/completions"),
            None,
            &request,
            self.config.timeout(),
        )
        .await?;

        Ok(Completion {
            text: reply.text,
            usage: reply.usage,
            endpoint: LM_STUDIO,
            fallback_from: None,
        })
    }

    /// Live probe of both engines, bypassing the cache
    pub async fn engine_health(&self) -> BTreeMap<&'static str, EngineStatus> {
        let ollama_url = self.probe_url(Engine::Ollama);
        let lm_studio_url = self.probe_url(Engine::LmStudio);
        let (ollama, lm_studio) = tokio::join!(self.probes.probe(&ollama_url), self.probes.probe(&lm_studio_url));

        BTreeMap::from([(OLLAMA, ollama), (LM_STUDIO, lm_studio)])
    }

    /// Installed models on each engine; an unreachable engine lists nothing
    pub async fn list_models(&self) -> LocalModels {
        let (ollama, lm_studio) = tokio::join!(self.ollama_models(), self.lm_studio_models());

        LocalModels {
            ollama: ollama.unwrap_or_else(|e| {
                tracing::debug!(engine = OLLAMA, error = %e, "failed to list models");
                Vec::new()
            }),
            lm_studio: lm_studio.unwrap_or_else(|e| {
                tracing::debug!(engine = LM_STUDIO, error = %e, "failed to list models");
                Vec::new()
            }),
        }
    }

    async fn ollama_models(&self) -> Result<Vec<String>, reqwest::Error> {
        let tags: OllamaTags = self
            .client
            .get(self.probe_url(Engine::Ollama))
            .timeout(self.config.probe_timeout())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    async fn lm_studio_models(&self) -> Result<Vec<String>, reqwest::Error> {
        let list: OpenAiModelList = self
            .client
            .get(self.probe_url(Engine::LmStudio))
            .timeout(self.config.probe_timeout())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}

#[async_trait]
impl BackendAdapter for LocalGenerateAdapter {
    async fn generate(&self, backend: Backend, prompt: &str, ctx: &DispatchContext) -> Result<Completion, AdapterError> {
        let snippets = match &ctx.context_id {
            Some(context_id) => {
                fetch_context(self.retriever.as_ref(), context_id, prompt, self.config.retrieval_top_k).await
            }
            None => Vec::new(),
        };
        let composed = compose_local_prompt(prompt, &snippets, &ctx.history, self.config.history_turns);

        let engine = self.select_engine().await?;
        tracing::debug!(backend = %backend, engine = engine.label(), snippets = snippets.len(), "local generation");

        if engine == Engine::Ollama {
            return self
                .call_ollama(backend, &composed)
                .await
                .map_err(|cause| AdapterError::at(OLLAMA, cause));
        }

        let started = Instant::now();
        let e = match self.call_lm_studio(backend, &composed).await {
            Ok(completion) => return Ok(completion),
            Err(e) => e,
        };
        let failed = FailedAttempt {
            endpoint: LM_STUDIO,
            elapsed: started.elapsed(),
        };

        tracing::warn!(backend = %backend, error = %e, "lm studio failed, falling back to ollama");
        self.probes.invalidate(&self.probe_url(Engine::LmStudio));

        match self.call_ollama(backend, &composed).await {
            Ok(completion) => Ok(Completion {
                fallback_from: Some(failed),
                ..completion
            }),
            Err(cause) => Err(AdapterError {
                endpoint: Some(OLLAMA),
                fallback_from: Some(failed),
                cause,
            }),
        }
    }
}

impl std::fmt::Debug for LocalGenerateAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalGenerateAdapter")
            .field("preferred", &self.config.preferred)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::NoRetrieval;

    fn adapter(preferred: PreferredEngine) -> LocalGenerateAdapter {
        let config = LocalConfig {
            ollama_url: "http://127.0.0.1:9".parse().unwrap(),
            lm_studio_url: "http://127.0.0.1:9".parse().unwrap(),
            preferred,
            probe_timeout_secs: 1,
            timeout_secs: 1,
            ..LocalConfig::default()
        };
        LocalGenerateAdapter::new(Client::new(), config, GenerationConfig::default(), Arc::new(NoRetrieval))
    }

    #[tokio::test]
    async fn pinned_engine_skips_probing() {
        assert_eq!(adapter(PreferredEngine::Ollama).select_engine().await.unwrap(), Engine::Ollama);
        assert_eq!(adapter(PreferredEngine::LmStudio).select_engine().await.unwrap(), Engine::LmStudio);
    }

    #[tokio::test]
    async fn auto_with_nothing_reachable_is_no_local_engine() {
        let err = adapter(PreferredEngine::Auto).select_engine().await.unwrap_err();
        assert!(matches!(err, BackendFailure::NoLocalEngine));
    }

    #[tokio::test]
    async fn unreachable_engines_list_no_models() {
        let models = adapter(PreferredEngine::Auto).list_models().await;
        assert!(models.ollama.is_empty());
        assert!(models.lm_studio.is_empty());
    }

    #[tokio::test]
    async fn health_reports_both_engines_unavailable() {
        let health = adapter(PreferredEngine::Auto).engine_health().await;
        assert_eq!(health.get(OLLAMA), Some(&EngineStatus::Unavailable));
        assert_eq!(health.get(LM_STUDIO), Some(&EngineStatus::Unavailable));
    }
}
