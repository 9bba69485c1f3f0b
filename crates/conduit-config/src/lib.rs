#![allow(clippy::must_use_candidate)]

pub mod dispatch;
mod env;
pub mod generation;
mod loader;
pub mod local;
pub mod telemetry;
pub mod vendor;

use serde::Deserialize;

pub use dispatch::DispatchConfig;
pub use generation::GenerationConfig;
pub use local::{LocalConfig, PreferredEngine};
pub use telemetry::{ExportProtocol, ExporterConfig, TelemetryConfig};
pub use vendor::{VendorConfig, VendorsConfig};

/// Top-level Conduit configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Local inference engines (Ollama, LM Studio)
    #[serde(default)]
    pub local: LocalConfig,
    /// Cloud vendor endpoints and credentials
    #[serde(default)]
    pub vendors: VendorsConfig,
    /// Sampling parameters and chat composition
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Dispatch deadlines
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
