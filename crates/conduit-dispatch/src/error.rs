//! Dispatch, adapter, and retrieval errors

use std::time::Duration;

use conduit_routing::Backend;
use reqwest::StatusCode;
use thiserror::Error;

use crate::types::FailedAttempt;

/// Errors surfaced to the caller of [`crate::Dispatcher::dispatch`]
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The selected backend could not produce a completion
    #[error("backend {backend} unavailable: {cause}")]
    BackendUnavailable { backend: Backend, cause: BackendFailure },
}

impl DispatchError {
    pub const fn backend(&self) -> Backend {
        match self {
            Self::BackendUnavailable { backend, .. } => *backend,
        }
    }

    pub const fn cause(&self) -> &BackendFailure {
        match self {
            Self::BackendUnavailable { cause, .. } => cause,
        }
    }
}

/// Why a backend call failed
#[derive(Debug, Error)]
pub enum BackendFailure {
    /// Connection, DNS, or TLS failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Backend answered with a non-success status
    #[error("backend returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Response body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// No response within the deadline
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Vendor has no configuration section
    #[error("vendor '{0}' is not configured")]
    NotConfigured(&'static str),

    /// Neither Ollama nor LM Studio answered the availability probe
    #[error("no local inference engine is reachable")]
    NoLocalEngine,
}

impl BackendFailure {
    /// Classify a `reqwest` send/receive error
    pub(crate) fn from_reqwest(error: &reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            Self::Timeout(timeout)
        } else if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error.to_string())
        }
    }
}

/// A failed adapter call and where it was attempted
#[derive(Debug, Error)]
#[error("{cause}")]
pub struct AdapterError {
    /// Engine or vendor that was called; `None` when no endpoint was chosen
    pub endpoint: Option<&'static str>,
    /// Engine that failed first when the failing call was a fallback
    pub fallback_from: Option<FailedAttempt>,
    pub cause: BackendFailure,
}

impl AdapterError {
    /// Failure attributed to a single endpoint
    pub const fn at(endpoint: &'static str, cause: BackendFailure) -> Self {
        Self {
            endpoint: Some(endpoint),
            fallback_from: None,
            cause,
        }
    }
}

impl From<BackendFailure> for AdapterError {
    fn from(cause: BackendFailure) -> Self {
        Self {
            endpoint: None,
            fallback_from: None,
            cause,
        }
    }
}

/// Retrieval service failure; logged and swallowed by the local adapter
#[derive(Debug, Error)]
#[error("retrieval failed: {0}")]
pub struct RetrievalError(pub String);
