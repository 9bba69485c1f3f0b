//! Ollama `/api/generate` and `/api/tags` wire types

use serde::{Deserialize, Serialize};

/// Non-streaming generate request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaGenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub options: OllamaOptions,
}

/// Sampling options
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaOptions {
    pub temperature: f64,
    /// Maximum tokens to generate
    pub num_predict: u32,
}

/// Generate response
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaGenerateResponse {
    #[serde(default)]
    pub response: String,
    /// Prompt tokens evaluated
    #[serde(default)]
    pub prompt_eval_count: u64,
    /// Tokens generated
    #[serde(default)]
    pub eval_count: u64,
}

/// Installed models listing
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaTags {
    #[serde(default)]
    pub models: Vec<OllamaModel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OllamaModel {
    pub name: String,
}
