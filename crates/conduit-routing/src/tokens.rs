//! Token estimation seam

use tiktoken_rs::CoreBPE;

/// Deterministic token counting for cost and threshold math
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// `cl100k_base` BPE counter with a bytes/4 fallback
pub struct TiktokenCounter {
    bpe: Option<CoreBPE>,
}

impl TiktokenCounter {
    pub fn new() -> Self {
        let bpe = tiktoken_rs::cl100k_base()
            .inspect_err(|e| tracing::warn!(error = %e, "failed to load cl100k_base, estimating tokens from length"))
            .ok();

        Self { bpe }
    }
}

impl Default for TiktokenCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe
            .as_ref()
            .map_or_else(|| text.len() / 4, |bpe| bpe.encode_with_special_tokens(text).len())
    }
}
