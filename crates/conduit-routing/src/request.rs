//! Routing request and decision types

use serde::Serialize;
use strum::{Display, EnumIter, EnumString};

use crate::{Backend, TaskCategory, Tier};

/// Jurisdiction a request must be served from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Region {
    #[default]
    Global,
    China,
    Both,
}

/// What the caller wants optimized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Priority {
    Quality,
    Cost,
    Speed,
    #[default]
    Balanced,
}

/// Input to the decision engine
#[derive(Debug, Clone, Default)]
pub struct RoutingRequest {
    /// Raw request text
    pub text: String,
    /// Declared category; inferred from `text` when absent
    pub task: Option<TaskCategory>,
    pub tier: Tier,
    pub region: Region,
    pub priority: Priority,
    /// Explicit `vendor:model` override, validated before anything else
    pub backend: Option<String>,
}

impl RoutingRequest {
    pub fn new(text: impl Into<String>, tier: Tier) -> Self {
        Self {
            text: text.into(),
            tier,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_task(mut self, task: TaskCategory) -> Self {
        self.task = Some(task);
        self
    }

    #[must_use]
    pub const fn with_region(mut self, region: Region) -> Self {
        self.region = region;
        self
    }

    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }
}

/// The engine's selection and its justification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutingDecision {
    pub backend: Backend,
    /// Self-assessed certainty in [0, 1]
    pub confidence: f64,
    /// Human-readable justification, never empty
    pub reasoning: String,
    /// `tokens / 1000 * cost_per_1k`, in USD
    pub estimated_cost: f64,
    pub task: TaskCategory,
    pub estimated_latency_ms: u32,
    pub region: Region,
    /// Set when the preferred backend was outside the tier
    pub fallback: bool,
    /// Token count the decision was made with
    pub tokens: usize,
}
