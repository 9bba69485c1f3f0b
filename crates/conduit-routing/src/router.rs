//! Router service that validates overrides and evaluates the policy

use std::sync::Arc;

use crate::classify::classify;
use crate::cost::{estimated_cost, estimated_latency};
use crate::{Backend, Region, RoutingDecision, RoutingError, RoutingRequest, TiktokenCounter, TokenCounter, engine};

/// Routing entry point: override validation, token counting, then the engine
#[derive(Clone)]
pub struct Router {
    counter: Arc<dyn TokenCounter>,
}

impl Router {
    pub fn new(counter: Arc<dyn TokenCounter>) -> Self {
        Self { counter }
    }

    /// Router backed by the `cl100k_base` tokenizer
    pub fn with_tiktoken() -> Self {
        Self::new(Arc::new(TiktokenCounter::new()))
    }

    /// Route a request
    ///
    /// An explicit backend override is validated before any token counting
    /// or classification; it must name a catalog backend the tier permits.
    pub fn route(&self, request: &RoutingRequest) -> Result<RoutingDecision, RoutingError> {
        let explicit = request
            .backend
            .as_deref()
            .map(|requested| resolve_override(requested, request))
            .transpose()?;

        let tokens = self.counter.count(&request.text);

        let Some(backend) = explicit else {
            return Ok(engine::route(request, tokens));
        };

        let decision = RoutingDecision {
            backend,
            confidence: 1.0,
            reasoning: "Explicit backend requested".to_owned(),
            estimated_cost: estimated_cost(backend, tokens),
            task: request.task.unwrap_or_else(|| classify(&request.text)),
            estimated_latency_ms: estimated_latency(backend),
            region: if request.region == Region::China {
                Region::China
            } else {
                Region::Global
            },
            fallback: false,
            tokens,
        };

        tracing::info!(backend = %backend, tier = %request.tier, tokens, "explicit backend override accepted");

        Ok(decision)
    }
}

fn resolve_override(requested: &str, request: &RoutingRequest) -> Result<Backend, RoutingError> {
    let backend = requested.trim().parse::<Backend>().map_err(|_| {
        tracing::warn!(requested, "unsupported backend requested");
        RoutingError::UnsupportedBackend {
            requested: requested.to_owned(),
        }
    })?;

    if !request.tier.permits(backend) {
        tracing::warn!(backend = %backend, tier = %request.tier, "explicit backend outside tier");
        return Err(RoutingError::BackendNotEntitled {
            backend,
            tier: request.tier,
        });
    }

    Ok(backend)
}
