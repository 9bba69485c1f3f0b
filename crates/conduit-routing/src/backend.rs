//! Closed backend catalog with static cost and latency tables

use serde::{Serialize, Serializer};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};

/// A (vendor, model) pair that can serve a completion
///
/// Parsed from and displayed as its `vendor:model` identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, IntoStaticStr, EnumIter, EnumCount,
)]
pub enum Backend {
    #[strum(serialize = "ollama:llama3.1")]
    OllamaLlama,
    #[strum(serialize = "ollama:llama3.1:70b")]
    OllamaLlama70b,
    #[strum(serialize = "ollama:qwen2.5")]
    OllamaQwen,
    #[strum(serialize = "openai:gpt-5")]
    Gpt5,
    #[strum(serialize = "openai:gpt-4o")]
    Gpt4o,
    #[strum(serialize = "openai:gpt-4o-mini")]
    Gpt4oMini,
    #[strum(serialize = "anthropic:claude-sonnet-4")]
    ClaudeSonnet,
    #[strum(serialize = "anthropic:claude-reasoning")]
    ClaudeReasoning,
    #[strum(serialize = "perplexity:sonar-pro")]
    Perplexity,
    #[strum(serialize = "zhipu:glm-4")]
    ZhipuGlm4,
    #[strum(serialize = "zhipu:glm-4-flash")]
    ZhipuGlm4Flash,
    #[strum(serialize = "deepseek:deepseek-r1")]
    DeepSeekR1,
    #[strum(serialize = "oss:gpt-oss")]
    GptOss,
}

/// Organization operating a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumIter)]
pub enum Vendor {
    /// Self-hosted engines (Ollama or LM Studio)
    #[strum(serialize = "local")]
    Local,
    #[strum(serialize = "openai")]
    OpenAi,
    #[strum(serialize = "anthropic")]
    Anthropic,
    #[strum(serialize = "perplexity")]
    Perplexity,
    #[strum(serialize = "zhipu")]
    Zhipu,
    #[strum(serialize = "deepseek")]
    DeepSeek,
    #[strum(serialize = "oss")]
    Oss,
}

impl Vendor {
    /// Configuration key and metrics label
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Wire protocol a backend speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ProtocolFamily {
    /// Local single-prompt generation
    LocalGenerate,
    /// Role-tagged chat completions
    ChatCompletions,
    /// Single-turn web-augmented chat
    SearchChat,
}

impl Backend {
    /// Every backend, in catalog order
    pub const ALL: [Self; Self::COUNT] = [
        Self::OllamaLlama,
        Self::OllamaLlama70b,
        Self::OllamaQwen,
        Self::Gpt5,
        Self::Gpt4o,
        Self::Gpt4oMini,
        Self::ClaudeSonnet,
        Self::ClaudeReasoning,
        Self::Perplexity,
        Self::ZhipuGlm4,
        Self::ZhipuGlm4Flash,
        Self::DeepSeekR1,
        Self::GptOss,
    ];

    /// `vendor:model` identifier
    pub fn id(self) -> &'static str {
        self.into()
    }

    /// Model name sent on the wire
    pub fn model(self) -> &'static str {
        let id = self.id();
        id.split_once(':').map_or(id, |(_, model)| model)
    }

    /// Dense index into per-backend arrays
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn vendor(self) -> Vendor {
        match self {
            Self::OllamaLlama | Self::OllamaLlama70b | Self::OllamaQwen => Vendor::Local,
            Self::Gpt5 | Self::Gpt4o | Self::Gpt4oMini => Vendor::OpenAi,
            Self::ClaudeSonnet | Self::ClaudeReasoning => Vendor::Anthropic,
            Self::Perplexity => Vendor::Perplexity,
            Self::ZhipuGlm4 | Self::ZhipuGlm4Flash => Vendor::Zhipu,
            Self::DeepSeekR1 => Vendor::DeepSeek,
            Self::GptOss => Vendor::Oss,
        }
    }

    pub const fn protocol(self) -> ProtocolFamily {
        match self.vendor() {
            Vendor::Local => ProtocolFamily::LocalGenerate,
            Vendor::Perplexity => ProtocolFamily::SearchChat,
            Vendor::OpenAi | Vendor::Anthropic | Vendor::Zhipu | Vendor::DeepSeek | Vendor::Oss => {
                ProtocolFamily::ChatCompletions
            }
        }
    }

    /// Price in USD per 1000 tokens
    pub const fn cost_per_1k(self) -> f64 {
        match self {
            Self::OllamaLlama | Self::OllamaLlama70b | Self::OllamaQwen => 0.0,
            Self::Gpt5 => 0.03,
            Self::Gpt4o => 0.005,
            Self::Gpt4oMini => 0.000_15,
            Self::ClaudeSonnet => 0.003,
            Self::ClaudeReasoning => 0.01,
            Self::Perplexity | Self::ZhipuGlm4 => 0.001,
            Self::ZhipuGlm4Flash | Self::DeepSeekR1 => 0.000_5,
            Self::GptOss => 0.000_1,
        }
    }

    /// Static latency estimate in milliseconds
    pub const fn latency_ms(self) -> u32 {
        match self {
            Self::OllamaLlama | Self::ZhipuGlm4Flash => 500,
            Self::OllamaQwen => 600,
            Self::Gpt4oMini => 800,
            Self::ZhipuGlm4 => 900,
            Self::ClaudeSonnet | Self::GptOss => 1000,
            Self::Gpt4o => 1200,
            Self::Gpt5 | Self::DeepSeekR1 => 1500,
            Self::OllamaLlama70b | Self::ClaudeReasoning => 2000,
            Self::Perplexity => 3000,
        }
    }

    /// Self-hosted backends are never billed
    pub const fn is_zero_cost(self) -> bool {
        matches!(self.vendor(), Vendor::Local)
    }
}

impl Serialize for Backend {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}
