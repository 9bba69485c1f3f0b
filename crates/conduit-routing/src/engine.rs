//! Routing decision engine
//!
//! Pure and lock-free: the only inputs are the request, its token count,
//! and the static catalog and tier tables.

use crate::classify::{classify, is_region_script};
use crate::cost::{estimated_cost, estimated_latency};
use crate::policy::{self, Candidate};
use crate::{Region, RoutingDecision, RoutingRequest, TaskCategory, Tier};

/// Pick exactly one backend for a request
///
/// A region-flagged request (`region = china` or CJK-dominant text) takes
/// the compliance chain regardless of category. Everything else goes
/// through the category chain for its declared or inferred task.
///
/// # Panics
///
/// Panics if a policy chain has no backend permitted for the tier. Chains
/// always end in a backend every tier may use, so this is a programming
/// error rather than an operational one.
pub fn route(request: &RoutingRequest, tokens: usize) -> RoutingDecision {
    let task = request.task.unwrap_or_else(|| classify(&request.text));
    let region_flagged = request.region == Region::China || is_region_script(&request.text);

    let chain = if region_flagged {
        policy::region_compliance(request.tier)
    } else {
        policy::for_task(task, request.tier, request.priority, tokens)
    };

    let decision = resolve(&chain, request.tier, task, tokens);

    tracing::info!(
        backend = %decision.backend,
        task = %task,
        tier = %request.tier,
        priority = %request.priority,
        region_flagged,
        tokens,
        confidence = decision.confidence,
        fallback = decision.fallback,
        "routing decision made"
    );

    decision
}

fn resolve(chain: &[Candidate], tier: Tier, task: TaskCategory, tokens: usize) -> RoutingDecision {
    let Some(position) = chain.iter().position(|c| tier.permits(c.backend)) else {
        tracing::error!(tier = %tier, task = %task, "policy chain has no backend permitted for tier");
        panic!("policy chain for {task} has no backend permitted for the {tier} tier");
    };

    let chosen = chain[position];
    let fallback = position > 0;
    let reasoning = if fallback {
        format!(
            "{} (fallback: {} is not available on the {tier} tier)",
            chosen.reasoning, chain[0].backend
        )
    } else {
        chosen.reasoning.to_owned()
    };

    RoutingDecision {
        backend: chosen.backend,
        confidence: chosen.confidence,
        reasoning,
        estimated_cost: estimated_cost(chosen.backend, tokens),
        task,
        estimated_latency_ms: estimated_latency(chosen.backend),
        region: chosen.region,
        fallback,
        tokens,
    }
}
