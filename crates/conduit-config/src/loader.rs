use std::path::Path;

use secrecy::ExposeSecret;

use crate::Config;

/// Largest completion size accepted in `[generation]`
const MAX_GENERATION_TOKENS: u32 = 8000;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or [`Config::parse`] fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::parse(&raw)
    }

    /// Expand `{{ env.VAR }}` placeholders, deserialize, and validate raw TOML
    ///
    /// # Errors
    ///
    /// Returns an error if variable expansion, TOML parsing, or validation fails
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_local()?;
        self.validate_vendors()?;
        self.validate_generation()?;

        if self.dispatch.request_timeout_secs == 0 {
            anyhow::bail!("dispatch.request_timeout_secs must be greater than 0");
        }

        Ok(())
    }

    fn validate_local(&self) -> anyhow::Result<()> {
        let local = &self.local;

        if local.probe_ttl_secs == 0 {
            anyhow::bail!("local.probe_ttl_secs must be greater than 0");
        }
        if local.probe_timeout_secs == 0 || local.timeout_secs == 0 {
            anyhow::bail!("local timeouts must be greater than 0");
        }
        for (name, url) in [("ollama_url", &local.ollama_url), ("lm_studio_url", &local.lm_studio_url)] {
            if !matches!(url.scheme(), "http" | "https") {
                anyhow::bail!("local.{name} must be an http(s) URL, got '{url}'");
            }
        }

        Ok(())
    }

    fn validate_vendors(&self) -> anyhow::Result<()> {
        for (name, vendor) in self.vendors.configured() {
            if vendor.timeout_secs == Some(0) {
                anyhow::bail!("vendors.{name}.timeout_secs must be greater than 0");
            }
            if vendor.api_key.as_ref().is_some_and(|k| k.expose_secret().is_empty()) {
                anyhow::bail!("vendors.{name}.api_key must not be empty when set");
            }
            if name == "oss" && vendor.base_url.is_none() {
                anyhow::bail!("vendors.oss requires a base_url");
            }
        }

        Ok(())
    }

    fn validate_generation(&self) -> anyhow::Result<()> {
        let generation = &self.generation;

        if !(0.0..=2.0).contains(&generation.temperature) {
            anyhow::bail!(
                "generation.temperature must be within [0, 2], got {}",
                generation.temperature
            );
        }
        if generation.max_tokens == 0 || generation.max_tokens > MAX_GENERATION_TOKENS {
            anyhow::bail!("generation.max_tokens must be within 1..={MAX_GENERATION_TOKENS}");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use secrecy::ExposeSecret;

    use crate::{Config, ExportProtocol, PreferredEngine};

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();

        assert_eq!(config.local.ollama_url.as_str(), "http://localhost:11434/");
        assert_eq!(config.local.lm_studio_url.as_str(), "http://localhost:1234/");
        assert_eq!(config.local.preferred, PreferredEngine::Auto);
        assert_eq!(config.local.probe_ttl_secs, 60);
        assert_eq!(config.local.probe_timeout_secs, 2);
        assert_eq!(config.local.retrieval_top_k, 3);
        assert_eq!(config.local.history_turns, 5);
        assert!((config.generation.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.generation.max_tokens, 2000);
        assert_eq!(config.generation.history_messages, 10);
        assert_eq!(config.dispatch.request_timeout_secs, 150);
        assert!(config.vendors.configured().next().is_none());
        assert!(config.telemetry.is_none());
    }

    #[test]
    fn full_config_round_trips_into_types() {
        let raw = r#"
            [local]
            ollama_url = "http://gpu-box:11434"
            preferred = "lm_studio"
            probe_ttl_secs = 30

            [vendors.openai]
            api_key = "sk-openai"

            [vendors.zhipu]
            api_key = "zhipu-key"
            base_url = "https://open.bigmodel.cn/api/paas/v4"
            timeout_secs = 45

            [generation]
            temperature = 0.2
            system_prompt = "Be brief."

            [telemetry]
            service_name = "conduit-test"

            [telemetry.exporter]
            endpoint = "http://localhost:4317"
            protocol = "http_proto"
        "#;

        let config = Config::parse(raw).unwrap();

        assert_eq!(config.local.ollama_url.host_str(), Some("gpu-box"));
        assert_eq!(config.local.preferred, PreferredEngine::LmStudio);
        assert_eq!(config.local.probe_ttl_secs, 30);

        let openai = config.vendors.get("openai").unwrap();
        assert_eq!(openai.api_key.as_ref().unwrap().expose_secret(), "sk-openai");
        assert!(openai.base_url.is_none());

        let zhipu = config.vendors.get("zhipu").unwrap();
        assert_eq!(zhipu.timeout_secs, Some(45));
        assert!(config.vendors.get("deepseek").is_none());

        assert_eq!(config.generation.system_prompt, "Be brief.");

        let telemetry = config.telemetry.unwrap();
        assert_eq!(telemetry.service_name, "conduit-test");
        assert_eq!(telemetry.exporter.unwrap().protocol, ExportProtocol::HttpProto);
    }

    #[test]
    fn api_key_expanded_from_environment() {
        temp_env::with_var("CONDUIT_LOADER_TEST_KEY", Some("from-env"), || {
            let config = Config::parse("[vendors.perplexity]\napi_key = \"{{ env.CONDUIT_LOADER_TEST_KEY }}\"").unwrap();
            let key = config.vendors.perplexity.unwrap().api_key.unwrap();
            assert_eq!(key.expose_secret(), "from-env");
        });
    }

    #[test]
    fn unknown_vendor_rejected() {
        let err = Config::parse("[vendors.mistral]\napi_key = \"x\"").unwrap_err();
        assert!(err.to_string().contains("failed to parse config"));
    }

    #[test]
    fn zero_probe_ttl_rejected() {
        let err = Config::parse("[local]\nprobe_ttl_secs = 0").unwrap_err();
        assert!(err.to_string().contains("probe_ttl_secs"));
    }

    #[test]
    fn temperature_out_of_range_rejected() {
        let err = Config::parse("[generation]\ntemperature = 2.5").unwrap_err();
        assert!(err.to_string().contains("temperature"));
    }

    #[test]
    fn max_tokens_bounds_enforced() {
        assert!(Config::parse("[generation]\nmax_tokens = 0").is_err());
        assert!(Config::parse("[generation]\nmax_tokens = 8001").is_err());
        assert!(Config::parse("[generation]\nmax_tokens = 8000").is_ok());
    }

    #[test]
    fn oss_vendor_requires_base_url() {
        let err = Config::parse("[vendors.oss]\napi_key = \"x\"").unwrap_err();
        assert!(err.to_string().contains("base_url"));

        assert!(Config::parse("[vendors.oss]\nbase_url = \"http://oss.internal/v1\"").is_ok());
    }

    #[test]
    fn non_http_local_url_rejected() {
        let err = Config::parse("[local]\nollama_url = \"ftp://localhost:11434\"").unwrap_err();
        assert!(err.to_string().contains("ollama_url"));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[local]\npreferred = \"ollama\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.local.preferred, PreferredEngine::Ollama);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Config::load(std::path::Path::new("/nonexistent/conduit.toml")).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }
}
