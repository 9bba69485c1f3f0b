//! Conversation, completion, and result types shared by the adapters

use std::time::Duration;

use conduit_routing::Backend;
use serde::{Deserialize, Serialize};

/// Author of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One prior message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Optional conversation context for a dispatch
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    /// Knowledge-base scope for retrieval; no retrieval when absent
    pub context_id: Option<String>,
    /// Prior turns, oldest first
    pub history: Vec<ConversationTurn>,
}

/// Tokens reported by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub prompt: u64,
    pub completion: u64,
    pub total: u64,
}

impl TokenUsage {
    pub const fn new(prompt: u64, completion: u64) -> Self {
        Self {
            prompt,
            completion,
            total: prompt.saturating_add(completion),
        }
    }
}

/// An engine call that failed before the adapter moved on to another engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailedAttempt {
    pub endpoint: &'static str,
    pub elapsed: Duration,
}

/// Normalized output of one protocol adapter call
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: TokenUsage,
    /// Engine or vendor that actually served the call
    pub endpoint: &'static str,
    /// Engine that failed first when the call was served by a fallback
    pub fallback_from: Option<FailedAttempt>,
}

/// Realized outcome of a dispatch
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    pub text: String,
    pub backend: Backend,
    /// Engine or vendor that served the call
    pub endpoint: &'static str,
    pub tokens: TokenUsage,
    /// Measured wall-clock latency
    pub latency_ms: u64,
    /// Cost from reported usage; supersedes the routing estimate
    pub cost_usd: f64,
}
