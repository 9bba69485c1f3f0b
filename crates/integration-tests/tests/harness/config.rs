//! Programmatic configuration builder for integration tests

use conduit_config::{Config, LocalConfig, PreferredEngine, VendorConfig};
use secrecy::SecretString;

/// Nothing listens on the discard port
pub const UNREACHABLE: &str = "http://127.0.0.1:9";

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Defaults with both local engines pointed at a closed port
    pub fn new() -> Self {
        Self {
            config: Config {
                local: LocalConfig {
                    ollama_url: UNREACHABLE.parse().expect("valid URL"),
                    lm_studio_url: UNREACHABLE.parse().expect("valid URL"),
                    probe_timeout_secs: 1,
                    timeout_secs: 5,
                    ..LocalConfig::default()
                },
                ..Config::default()
            },
        }
    }

    /// Point Ollama at a mock
    pub fn with_ollama(mut self, url: &str) -> Self {
        self.config.local.ollama_url = url.parse().expect("valid URL");
        self
    }

    /// Point LM Studio at a mock
    pub fn with_lm_studio(mut self, url: &str) -> Self {
        self.config.local.lm_studio_url = url.parse().expect("valid URL");
        self
    }

    pub fn with_preferred(mut self, preferred: PreferredEngine) -> Self {
        self.config.local.preferred = preferred;
        self
    }

    pub fn with_local_timeout(mut self, secs: u64) -> Self {
        self.config.local.timeout_secs = secs;
        self
    }

    /// Add a cloud vendor section pointed at a mock
    pub fn with_vendor(mut self, name: &str, base_url: &str) -> Self {
        let section = Some(VendorConfig {
            api_key: Some(SecretString::from("test-key")),
            base_url: Some(base_url.parse().expect("valid URL")),
            timeout_secs: None,
        });

        let vendors = &mut self.config.vendors;
        match name {
            "openai" => vendors.openai = section,
            "anthropic" => vendors.anthropic = section,
            "perplexity" => vendors.perplexity = section,
            "zhipu" => vendors.zhipu = section,
            "deepseek" => vendors.deepseek = section,
            "oss" => vendors.oss = section,
            other => panic!("unknown vendor {other}"),
        }
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
