//! Backend selection for Conduit
//!
//! A closed catalog of backends, an ordered keyword classifier, per-tier
//! entitlements, and a deterministic decision engine that resolves every
//! request to exactly one permitted backend with a reasoning trail.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod backend;
pub mod classify;
pub mod cost;
pub mod engine;
pub mod error;
mod policy;
pub mod request;
mod router;
pub mod task;
pub mod tier;
pub mod tokens;

pub use backend::{Backend, ProtocolFamily, Vendor};
pub use classify::classify;
pub use cost::{estimated_cost, estimated_latency};
pub use error::RoutingError;
pub use request::{Priority, Region, RoutingDecision, RoutingRequest};
pub use router::Router;
pub use task::TaskCategory;
pub use tier::Tier;
pub use tokens::{TiktokenCounter, TokenCounter};
