//! Backend health reporting

use std::collections::BTreeMap;

use serde::Serialize;

/// Live probe outcome for a local engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineStatus {
    /// Probe returned a success status
    Healthy,
    /// Engine answered, but not with success
    Unhealthy,
    /// Engine could not be reached
    Unavailable,
}

/// Whether a cloud vendor has a configuration section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorStatus {
    Configured,
    NotConfigured,
}

/// Point-in-time health of every backend endpoint
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    /// Keyed by engine label (`ollama`, `lm_studio`)
    pub local: BTreeMap<&'static str, EngineStatus>,
    /// Keyed by vendor name
    pub vendors: BTreeMap<&'static str, VendorStatus>,
}

impl HealthReport {
    /// At least one local engine answered its probe
    pub fn local_available(&self) -> bool {
        self.local.values().any(|status| *status == EngineStatus::Healthy)
    }
}
