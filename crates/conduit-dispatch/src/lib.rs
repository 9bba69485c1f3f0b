//! Backend invocation for Conduit
//!
//! Turns a routing decision into a completion through one adapter per
//! protocol family (local generation, chat completions, search-augmented
//! chat), and keeps process-lifetime usage counters for every backend.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod adapter;
mod dispatcher;
pub mod error;
pub mod health;
pub mod probe;
pub mod prompt;
pub mod protocol;
pub mod retrieval;
pub mod sink;
pub mod types;
pub mod usage;

pub use adapter::{BackendAdapter, LocalModels};
pub use dispatcher::Dispatcher;
pub use error::{AdapterError, BackendFailure, DispatchError, RetrievalError};
pub use health::{EngineStatus, HealthReport, VendorStatus};
pub use retrieval::{NoRetrieval, Retriever};
pub use sink::{MetricsSink, NoopSink, OtelMetricsSink, Outcome, UsageEvent};
pub use types::{Completion, ConversationTurn, DispatchContext, DispatchResult, FailedAttempt, Role, TokenUsage};
pub use usage::{BackendUsage, EndpointUsage, UsageLedger, UsageSnapshot};
