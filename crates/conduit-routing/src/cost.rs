//! Estimated cost and latency lookups

use crate::Backend;

/// `tokens / 1000 * cost_per_1k`; always 0.0 for zero-cost backends
#[allow(clippy::cast_precision_loss)]
pub fn estimated_cost(backend: Backend, tokens: usize) -> f64 {
    if backend.is_zero_cost() {
        return 0.0;
    }
    tokens as f64 / 1000.0 * backend.cost_per_1k()
}

/// Static latency estimate, never measured
pub const fn estimated_latency(backend: Backend) -> u32 {
    backend.latency_ms()
}
