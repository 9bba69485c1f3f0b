//! Fire-and-forget export of dispatch outcomes

use std::time::Duration;

use conduit_routing::Backend;
use conduit_telemetry::metrics::{
    ATTR_BACKEND, ATTR_ENDPOINT, ATTR_OUTCOME, ATTR_TOKEN_TYPE, BACKEND_FAILURES, BACKEND_REQUESTS, BACKEND_TOKENS,
    DISPATCH_DURATION, record_duration,
};
use conduit_telemetry::{Counter, Histogram, KeyValue, Meter};

use crate::types::TokenUsage;

/// How a dispatch ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// One finished dispatch
#[derive(Debug, Clone)]
pub struct UsageEvent {
    pub backend: Backend,
    /// Engine or vendor label; `None` when no endpoint was called
    pub endpoint: Option<&'static str>,
    pub outcome: Outcome,
    /// Zero on failure
    pub tokens: TokenUsage,
    pub elapsed: Duration,
}

/// External metrics sink
///
/// Called synchronously on the dispatch path; implementations must not
/// block and have no way to fail the request.
pub trait MetricsSink: Send + Sync {
    fn record(&self, event: &UsageEvent);
}

/// Sink that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl MetricsSink for NoopSink {
    fn record(&self, _event: &UsageEvent) {}
}

/// Sink backed by OpenTelemetry instruments
#[derive(Clone)]
pub struct OtelMetricsSink {
    requests: Counter<u64>,
    failures: Counter<u64>,
    tokens: Counter<u64>,
    duration: Histogram<f64>,
}

impl OtelMetricsSink {
    pub fn new(meter: &Meter) -> Self {
        Self {
            requests: meter
                .u64_counter(BACKEND_REQUESTS)
                .with_description("Dispatches per backend")
                .build(),
            failures: meter
                .u64_counter(BACKEND_FAILURES)
                .with_description("Failed dispatches per backend")
                .build(),
            tokens: meter
                .u64_counter(BACKEND_TOKENS)
                .with_description("Tokens reported by backends")
                .with_unit("{token}")
                .build(),
            duration: meter
                .f64_histogram(DISPATCH_DURATION)
                .with_description("Dispatch wall-clock duration")
                .with_unit("s")
                .build(),
        }
    }
}

impl Default for OtelMetricsSink {
    fn default() -> Self {
        Self::new(&conduit_telemetry::meter())
    }
}

impl std::fmt::Debug for OtelMetricsSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OtelMetricsSink").finish_non_exhaustive()
    }
}

impl MetricsSink for OtelMetricsSink {
    fn record(&self, event: &UsageEvent) {
        let backend = KeyValue::new(ATTR_BACKEND, event.backend.id());
        let mut attributes = vec![backend.clone()];
        if let Some(endpoint) = event.endpoint {
            attributes.push(KeyValue::new(ATTR_ENDPOINT, endpoint));
        }

        self.requests.add(1, &attributes);
        attributes.push(KeyValue::new(ATTR_OUTCOME, event.outcome.as_str()));
        record_duration(&self.duration, event.elapsed, &attributes);

        if event.outcome == Outcome::Failure {
            self.failures.add(1, std::slice::from_ref(&backend));
            return;
        }

        for (kind, value) in [
            ("prompt", event.tokens.prompt),
            ("completion", event.tokens.completion),
            ("total", event.tokens.total),
        ] {
            if value > 0 {
                self.tokens
                    .add(value, &[backend.clone(), KeyValue::new(ATTR_TOKEN_TYPE, kind)]);
            }
        }
    }
}
