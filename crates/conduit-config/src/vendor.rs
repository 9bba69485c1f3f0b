//! Cloud vendor configuration

use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Credentials and endpoint overrides for one cloud vendor
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorConfig {
    /// API key sent as a bearer token
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Override the vendor's default base URL
    #[serde(default)]
    pub base_url: Option<Url>,
    /// Override the per-backend default timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl VendorConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// One optional section per supported vendor
///
/// A vendor without a section is not configured and its backends fail
/// dispatch with a not-configured error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorsConfig {
    #[serde(default)]
    pub openai: Option<VendorConfig>,
    #[serde(default)]
    pub anthropic: Option<VendorConfig>,
    #[serde(default)]
    pub perplexity: Option<VendorConfig>,
    #[serde(default)]
    pub zhipu: Option<VendorConfig>,
    #[serde(default)]
    pub deepseek: Option<VendorConfig>,
    #[serde(default)]
    pub oss: Option<VendorConfig>,
}

impl VendorsConfig {
    /// Look up a vendor section by its configuration key
    pub fn get(&self, name: &str) -> Option<&VendorConfig> {
        match name {
            "openai" => self.openai.as_ref(),
            "anthropic" => self.anthropic.as_ref(),
            "perplexity" => self.perplexity.as_ref(),
            "zhipu" => self.zhipu.as_ref(),
            "deepseek" => self.deepseek.as_ref(),
            "oss" => self.oss.as_ref(),
            _ => None,
        }
    }

    /// Iterate configured vendors with their keys
    pub fn configured(&self) -> impl Iterator<Item = (&'static str, &VendorConfig)> {
        [
            ("openai", self.openai.as_ref()),
            ("anthropic", self.anthropic.as_ref()),
            ("perplexity", self.perplexity.as_ref()),
            ("zhipu", self.zhipu.as_ref()),
            ("deepseek", self.deepseek.as_ref()),
            ("oss", self.oss.as_ref()),
        ]
        .into_iter()
        .filter_map(|(name, config)| config.map(|c| (name, c)))
    }
}
