use std::time::Duration;

use serde::Deserialize;

/// Dispatch-wide deadlines
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DispatchConfig {
    /// Overall deadline for one dispatch, including the local fallback
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl DispatchConfig {
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
        }
    }
}

const fn default_request_timeout() -> u64 {
    150
}
