//! Wire formats for the supported backend APIs

pub mod ollama;
pub mod openai;
