//! Metric names and attribute keys

use std::time::Duration;

use opentelemetry::KeyValue;
use opentelemetry::metrics::Histogram;

/// Dispatch attempts per backend
pub const BACKEND_REQUESTS: &str = "conduit.backend.requests";
/// Failed dispatches per backend
pub const BACKEND_FAILURES: &str = "conduit.backend.failures";
/// Tokens consumed per backend, split by `type`
pub const BACKEND_TOKENS: &str = "conduit.backend.tokens";
/// Wall-clock dispatch duration in seconds
pub const DISPATCH_DURATION: &str = "conduit.dispatch.duration";

pub const ATTR_BACKEND: &str = "backend";
pub const ATTR_ENDPOINT: &str = "endpoint";
pub const ATTR_OUTCOME: &str = "outcome";
pub const ATTR_TOKEN_TYPE: &str = "type";

/// Record a duration in seconds
pub fn record_duration(histogram: &Histogram<f64>, duration: Duration, attributes: &[KeyValue]) {
    histogram.record(duration.as_secs_f64(), attributes);
}
