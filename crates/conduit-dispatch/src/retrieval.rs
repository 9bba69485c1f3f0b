//! Knowledge-base retrieval seam

use async_trait::async_trait;

use crate::error::RetrievalError;

/// Retrieval service consulted by the local-generate adapter
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Ordered snippets relevant to `query` within `context_id`
    async fn search(&self, context_id: &str, query: &str, top_k: usize) -> Result<Vec<String>, RetrievalError>;
}

/// Retriever that never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRetrieval;

#[async_trait]
impl Retriever for NoRetrieval {
    async fn search(&self, _context_id: &str, _query: &str, _top_k: usize) -> Result<Vec<String>, RetrievalError> {
        Ok(Vec::new())
    }
}

/// Search, treating any failure as "no context available"
pub(crate) async fn fetch_context(retriever: &dyn Retriever, context_id: &str, query: &str, top_k: usize) -> Vec<String> {
    match retriever.search(context_id, query, top_k).await {
        Ok(mut snippets) => {
            snippets.truncate(top_k);
            snippets
        }
        Err(e) => {
            tracing::warn!(context_id, error = %e, "retrieval failed, continuing without context");
            Vec::new()
        }
    }
}
