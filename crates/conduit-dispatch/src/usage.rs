//! Process-lifetime usage accounting
//!
//! Every counter is monotonic and updated with atomic adds, so concurrent
//! dispatches never lose an increment. Reads take a snapshot that may mix
//! values from in-flight dispatches but never goes backwards.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use conduit_routing::Backend;
use dashmap::DashMap;
use serde::Serialize;

use crate::types::{FailedAttempt, TokenUsage};

#[derive(Debug, Default)]
struct BackendCounters {
    requests: AtomicU64,
    failures: AtomicU64,
    prompt_tokens: AtomicU64,
    completion_tokens: AtomicU64,
    total_tokens: AtomicU64,
    duration_ms: AtomicU64,
}

#[derive(Debug, Default)]
struct EndpointCounters {
    requests: AtomicU64,
    failures: AtomicU64,
    duration_ms: AtomicU64,
}

/// Cumulative counters for one backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackendUsage {
    pub requests: u64,
    pub failures: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
    pub duration_ms: u64,
}

/// Cumulative counters for one serving endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EndpointUsage {
    pub requests: u64,
    pub failures: u64,
    pub duration_ms: u64,
}

/// Read-only copy of the ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageSnapshot {
    pub backends: BTreeMap<Backend, BackendUsage>,
    pub endpoints: BTreeMap<&'static str, EndpointUsage>,
}

impl UsageSnapshot {
    /// Counters for `backend`, zeroed if it was never used
    pub fn backend(&self, backend: Backend) -> BackendUsage {
        self.backends.get(&backend).copied().unwrap_or_default()
    }

    pub fn endpoint(&self, label: &str) -> EndpointUsage {
        self.endpoints.get(label).copied().unwrap_or_default()
    }
}

/// Per-backend and per-endpoint counters shared by all dispatches
#[derive(Debug)]
pub struct UsageLedger {
    backends: [BackendCounters; Backend::ALL.len()],
    endpoints: DashMap<&'static str, EndpointCounters>,
}

impl Default for UsageLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl UsageLedger {
    pub fn new() -> Self {
        Self {
            backends: std::array::from_fn(|_| BackendCounters::default()),
            endpoints: DashMap::new(),
        }
    }

    const fn counters(&self, backend: Backend) -> &BackendCounters {
        &self.backends[backend.index()]
    }

    /// Count a dispatch attempt as it starts
    pub fn record_attempt(&self, backend: Backend) {
        self.counters(backend).requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Add reported tokens and elapsed time for a completed dispatch
    pub fn record_success(&self, backend: Backend, endpoint: &'static str, tokens: TokenUsage, elapsed: Duration) {
        let counters = self.counters(backend);
        saturating_add(&counters.prompt_tokens, tokens.prompt);
        saturating_add(&counters.completion_tokens, tokens.completion);
        saturating_add(&counters.total_tokens, tokens.total);
        counters.duration_ms.fetch_add(millis(elapsed), Ordering::Relaxed);

        self.record_endpoint(endpoint, false, elapsed);
    }

    /// Count a failed dispatch and its elapsed time
    ///
    /// `endpoint` is `None` when the dispatch failed before any engine or
    /// vendor was called.
    pub fn record_failure(&self, backend: Backend, endpoint: Option<&'static str>, elapsed: Duration) {
        let counters = self.counters(backend);
        counters.failures.fetch_add(1, Ordering::Relaxed);
        counters.duration_ms.fetch_add(millis(elapsed), Ordering::Relaxed);

        if let Some(endpoint) = endpoint {
            self.record_endpoint(endpoint, true, elapsed);
        }
    }

    /// Count an engine call that failed inside a dispatch that moved on to
    /// another engine; backend counters are left alone
    pub fn record_fallback(&self, attempt: FailedAttempt) {
        self.record_endpoint(attempt.endpoint, true, attempt.elapsed);
    }

    fn record_endpoint(&self, endpoint: &'static str, failed: bool, elapsed: Duration) {
        let counters = self.endpoints.entry(endpoint).or_default();
        counters.requests.fetch_add(1, Ordering::Relaxed);
        if failed {
            counters.failures.fetch_add(1, Ordering::Relaxed);
        }
        counters.duration_ms.fetch_add(millis(elapsed), Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> UsageSnapshot {
        let backends = Backend::ALL
            .iter()
            .map(|&backend| {
                let c = self.counters(backend);
                let usage = BackendUsage {
                    requests: c.requests.load(Ordering::Relaxed),
                    failures: c.failures.load(Ordering::Relaxed),
                    prompt_tokens: c.prompt_tokens.load(Ordering::Relaxed),
                    completion_tokens: c.completion_tokens.load(Ordering::Relaxed),
                    total_tokens: c.total_tokens.load(Ordering::Relaxed),
                    duration_ms: c.duration_ms.load(Ordering::Relaxed),
                };
                (backend, usage)
            })
            .collect();

        let endpoints = self
            .endpoints
            .iter()
            .map(|entry| {
                let c = entry.value();
                let usage = EndpointUsage {
                    requests: c.requests.load(Ordering::Relaxed),
                    failures: c.failures.load(Ordering::Relaxed),
                    duration_ms: c.duration_ms.load(Ordering::Relaxed),
                };
                (*entry.key(), usage)
            })
            .collect();

        UsageSnapshot { backends, endpoints }
    }
}

/// Add without wrapping past `u64::MAX`
fn saturating_add(counter: &AtomicU64, value: u64) {
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
        Some(current.saturating_add(value))
    });
}

fn millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn fresh_ledger_reports_every_backend_at_zero() {
        let snapshot = UsageLedger::new().snapshot();

        assert_eq!(snapshot.backends.len(), Backend::ALL.len());
        assert!(snapshot.backends.values().all(|u| *u == BackendUsage::default()));
        assert!(snapshot.endpoints.is_empty());
    }

    #[test]
    fn success_adds_tokens_and_endpoint_counts() {
        let ledger = UsageLedger::new();
        ledger.record_attempt(Backend::Gpt4o);
        ledger.record_success(Backend::Gpt4o, "openai", TokenUsage::new(120, 80), Duration::from_millis(40));

        let snapshot = ledger.snapshot();
        let usage = snapshot.backend(Backend::Gpt4o);
        assert_eq!(usage.requests, 1);
        assert_eq!(usage.failures, 0);
        assert_eq!(usage.prompt_tokens, 120);
        assert_eq!(usage.completion_tokens, 80);
        assert_eq!(usage.total_tokens, 200);
        assert_eq!(usage.duration_ms, 40);
        assert_eq!(snapshot.endpoint("openai"), EndpointUsage {
            requests: 1,
            failures: 0,
            duration_ms: 40,
        });
    }

    #[test]
    fn failure_counts_without_tokens() {
        let ledger = UsageLedger::new();
        ledger.record_attempt(Backend::OllamaLlama);
        ledger.record_failure(Backend::OllamaLlama, Some("ollama"), Duration::from_millis(5));

        let snapshot = ledger.snapshot();
        let usage = snapshot.backend(Backend::OllamaLlama);
        assert_eq!(usage.requests, 1);
        assert_eq!(usage.failures, 1);
        assert_eq!(usage.total_tokens, 0);
        assert_eq!(snapshot.endpoint("ollama").failures, 1);
    }

    #[test]
    fn failure_before_any_endpoint_counts_only_the_backend() {
        let ledger = UsageLedger::new();
        ledger.record_attempt(Backend::OllamaQwen);
        ledger.record_failure(Backend::OllamaQwen, None, Duration::from_millis(2));

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.backend(Backend::OllamaQwen).failures, 1);
        assert!(snapshot.endpoints.is_empty());
    }

    #[test]
    fn fallback_counts_the_engine_but_not_the_backend() {
        let ledger = UsageLedger::new();
        ledger.record_attempt(Backend::OllamaLlama);
        ledger.record_fallback(FailedAttempt {
            endpoint: "lm_studio",
            elapsed: Duration::from_millis(7),
        });
        ledger.record_success(Backend::OllamaLlama, "ollama", TokenUsage::new(1, 1), Duration::from_millis(20));

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.backend(Backend::OllamaLlama).failures, 0);
        assert_eq!(snapshot.endpoint("lm_studio"), EndpointUsage {
            requests: 1,
            failures: 1,
            duration_ms: 7,
        });
        assert_eq!(snapshot.endpoint("ollama").failures, 0);
    }

    #[test]
    fn oversized_token_counts_saturate() {
        let ledger = UsageLedger::new();
        ledger.record_success(Backend::Gpt4o, "openai", TokenUsage::new(u64::MAX, 0), Duration::ZERO);
        ledger.record_success(Backend::Gpt4o, "openai", TokenUsage::new(5, 0), Duration::ZERO);

        assert_eq!(ledger.snapshot().backend(Backend::Gpt4o).prompt_tokens, u64::MAX);
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let ledger = Arc::new(UsageLedger::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        ledger.record_attempt(Backend::OllamaQwen);
                        ledger.record_success(Backend::OllamaQwen, "ollama", TokenUsage::new(2, 1), Duration::ZERO);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = ledger.snapshot();
        let usage = snapshot.backend(Backend::OllamaQwen);
        assert_eq!(usage.requests, 8000);
        assert_eq!(usage.total_tokens, 24_000);
        assert_eq!(snapshot.endpoint("ollama").requests, 8000);
    }

    #[test]
    fn snapshot_serializes_backends_by_id() {
        let ledger = UsageLedger::new();
        ledger.record_attempt(Backend::ZhipuGlm4Flash);

        let json = serde_json::to_value(ledger.snapshot()).unwrap();
        assert_eq!(json["backends"]["zhipu:glm-4-flash"]["requests"], 1);
    }
}
