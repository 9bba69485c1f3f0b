//! Local inference engine configuration

use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Which local engine serves local-generate backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferredEngine {
    /// Probe both engines, prefer LM Studio when both respond
    #[default]
    Auto,
    /// Always use Ollama
    Ollama,
    /// Always use LM Studio (falls back to Ollama once on failure)
    LmStudio,
}

/// Settings for the Ollama and LM Studio engines
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocalConfig {
    /// Ollama base URL
    #[serde(default = "default_ollama_url")]
    pub ollama_url: Url,
    /// LM Studio base URL
    #[serde(default = "default_lm_studio_url")]
    pub lm_studio_url: Url,
    /// Engine selection mode
    #[serde(default)]
    pub preferred: PreferredEngine,
    /// How long an availability probe result stays cached
    #[serde(default = "default_probe_ttl")]
    pub probe_ttl_secs: u64,
    /// Timeout for a single availability probe
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
    /// Timeout for a local generate call
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Number of retrieved snippets folded into the prompt
    #[serde(default = "default_top_k")]
    pub retrieval_top_k: usize,
    /// Trailing conversation turns folded into the prompt
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,
}

impl LocalConfig {
    pub const fn probe_ttl(&self) -> Duration {
        Duration::from_secs(self.probe_ttl_secs)
    }

    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            ollama_url: default_ollama_url(),
            lm_studio_url: default_lm_studio_url(),
            preferred: PreferredEngine::default(),
            probe_ttl_secs: default_probe_ttl(),
            probe_timeout_secs: default_probe_timeout(),
            timeout_secs: default_timeout(),
            retrieval_top_k: default_top_k(),
            history_turns: default_history_turns(),
        }
    }
}

fn default_ollama_url() -> Url {
    Url::parse("http://localhost:11434").expect("valid default Ollama URL")
}

fn default_lm_studio_url() -> Url {
    Url::parse("http://localhost:1234").expect("valid default LM Studio URL")
}

const fn default_probe_ttl() -> u64 {
    60
}

const fn default_probe_timeout() -> u64 {
    2
}

const fn default_timeout() -> u64 {
    60
}

const fn default_top_k() -> usize {
    3
}

const fn default_history_turns() -> usize {
    5
}
