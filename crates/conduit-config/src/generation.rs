use serde::Deserialize;

/// Sampling parameters and chat message composition
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// System message prepended to chat-completions calls
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Trailing history messages sent to chat-completions backends
    #[serde(default = "default_history_messages")]
    pub history_messages: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            system_prompt: default_system_prompt(),
            history_messages: default_history_messages(),
        }
    }
}

const fn default_temperature() -> f64 {
    0.7
}

const fn default_max_tokens() -> u32 {
    2000
}

fn default_system_prompt() -> String {
    "You are a helpful AI assistant.".to_owned()
}

const fn default_history_messages() -> usize {
    10
}
