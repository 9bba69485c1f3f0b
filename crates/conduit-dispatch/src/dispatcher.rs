//! Routing decision to completion, with usage accounting

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use conduit_config::{Config, VendorsConfig};
use conduit_routing::{Backend, ProtocolFamily, RoutingDecision, Vendor, estimated_cost};
use reqwest::Client;

use crate::adapter::{BackendAdapter, ChatCompletionsAdapter, LocalGenerateAdapter, LocalModels, SearchChatAdapter};
use crate::error::{AdapterError, BackendFailure, DispatchError};
use crate::health::{HealthReport, VendorStatus};
use crate::retrieval::Retriever;
use crate::sink::{MetricsSink, Outcome, UsageEvent};
use crate::types::{DispatchContext, DispatchResult, TokenUsage};
use crate::usage::{UsageLedger, UsageSnapshot};

/// Invokes the backend a routing decision selected
///
/// Holds one adapter per protocol family, the shared usage ledger, and the
/// metrics sink. Cheap to share behind an `Arc`; every method takes `&self`.
pub struct Dispatcher {
    local: Arc<dyn BackendAdapter>,
    chat: Arc<dyn BackendAdapter>,
    search: Arc<dyn BackendAdapter>,
    local_engines: Arc<LocalGenerateAdapter>,
    vendors: VendorsConfig,
    ledger: UsageLedger,
    sink: Arc<dyn MetricsSink>,
    request_timeout: Duration,
}

impl Dispatcher {
    /// Build the production adapters from configuration
    pub fn from_config(config: &Config, retriever: Arc<dyn Retriever>, sink: Arc<dyn MetricsSink>) -> Self {
        let client = Client::new();

        let local_engines = Arc::new(LocalGenerateAdapter::new(
            client.clone(),
            config.local.clone(),
            config.generation.clone(),
            retriever,
        ));
        let chat = ChatCompletionsAdapter::new(client.clone(), config.vendors.clone(), config.generation.clone());
        let search = SearchChatAdapter::new(client, config.vendors.perplexity.clone());

        Self {
            local: local_engines.clone(),
            chat: Arc::new(chat),
            search: Arc::new(search),
            local_engines,
            vendors: config.vendors.clone(),
            ledger: UsageLedger::new(),
            sink,
            request_timeout: config.dispatch.request_timeout(),
        }
    }

    /// Replace the adapter serving a protocol family
    #[must_use]
    pub fn with_adapter(mut self, family: ProtocolFamily, adapter: Arc<dyn BackendAdapter>) -> Self {
        match family {
            ProtocolFamily::LocalGenerate => self.local = adapter,
            ProtocolFamily::ChatCompletions => self.chat = adapter,
            ProtocolFamily::SearchChat => self.search = adapter,
        }
        self
    }

    /// Override the overall per-request deadline
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn adapter(&self, family: ProtocolFamily) -> &dyn BackendAdapter {
        match family {
            ProtocolFamily::LocalGenerate => self.local.as_ref(),
            ProtocolFamily::ChatCompletions => self.chat.as_ref(),
            ProtocolFamily::SearchChat => self.search.as_ref(),
        }
    }

    /// Call the decided backend and account for the outcome
    ///
    /// Failures are never retried here; the only fallback is the local
    /// adapter's single LM Studio to Ollama retry.
    pub async fn dispatch(
        &self,
        decision: &RoutingDecision,
        prompt: &str,
        ctx: &DispatchContext,
    ) -> Result<DispatchResult, DispatchError> {
        let backend = decision.backend;
        self.ledger.record_attempt(backend);

        let started = Instant::now();
        let generated = tokio::time::timeout(
            self.request_timeout,
            self.adapter(backend.protocol()).generate(backend, prompt, ctx),
        )
        .await
        .unwrap_or_else(|_| Err(AdapterError::from(BackendFailure::Timeout(self.request_timeout))));
        let elapsed = started.elapsed();

        let fallback_from = match &generated {
            Ok(completion) => completion.fallback_from,
            Err(e) => e.fallback_from,
        };
        if let Some(attempt) = fallback_from {
            self.ledger.record_fallback(attempt);
        }

        match generated {
            Ok(completion) => {
                self.ledger
                    .record_success(backend, completion.endpoint, completion.usage, elapsed);
                self.sink.record(&UsageEvent {
                    backend,
                    endpoint: Some(completion.endpoint),
                    outcome: Outcome::Success,
                    tokens: completion.usage,
                    elapsed,
                });

                let tokens = usize::try_from(completion.usage.total).unwrap_or(usize::MAX);
                let result = DispatchResult {
                    text: completion.text,
                    backend,
                    endpoint: completion.endpoint,
                    tokens: completion.usage,
                    latency_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                    cost_usd: estimated_cost(backend, tokens),
                };

                tracing::info!(
                    backend = %backend,
                    endpoint = result.endpoint,
                    tokens = result.tokens.total,
                    latency_ms = result.latency_ms,
                    cost_usd = result.cost_usd,
                    estimated_cost_usd = decision.estimated_cost,
                    "dispatch completed"
                );

                Ok(result)
            }
            Err(AdapterError { endpoint, cause, .. }) => {
                self.ledger.record_failure(backend, endpoint, elapsed);
                self.sink.record(&UsageEvent {
                    backend,
                    endpoint,
                    outcome: Outcome::Failure,
                    tokens: TokenUsage::default(),
                    elapsed,
                });

                tracing::error!(backend = %backend, endpoint, error = %cause, "dispatch failed");

                Err(DispatchError::BackendUnavailable { backend, cause })
            }
        }
    }

    /// Snapshot of the cumulative usage counters
    pub fn usage(&self) -> UsageSnapshot {
        self.ledger.snapshot()
    }

    /// Live local engine probes plus vendor configuration status
    pub async fn health(&self) -> HealthReport {
        let vendors: BTreeMap<_, _> = Backend::ALL
            .iter()
            .map(|backend| backend.vendor())
            .filter(|vendor| *vendor != Vendor::Local)
            .map(|vendor| {
                let name = vendor.as_str();
                let status = if self.vendors.get(name).is_some() {
                    VendorStatus::Configured
                } else {
                    VendorStatus::NotConfigured
                };
                (name, status)
            })
            .collect();

        HealthReport {
            local: self.local_engines.engine_health().await,
            vendors,
        }
    }

    /// Models installed on the local engines
    pub async fn local_models(&self) -> LocalModels {
        self.local_engines.list_models().await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
