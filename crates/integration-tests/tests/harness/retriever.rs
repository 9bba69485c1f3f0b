//! Scripted retrieval services

use std::sync::Mutex;

use async_trait::async_trait;
use conduit_dispatch::{RetrievalError, Retriever};

/// Returns fixed snippets and records every query
#[derive(Default)]
pub struct FixedRetriever {
    snippets: Vec<String>,
    queries: Mutex<Vec<(String, String, usize)>>,
}

impl FixedRetriever {
    pub fn new(snippets: &[&str]) -> Self {
        Self {
            snippets: snippets.iter().map(|s| (*s).to_owned()).collect(),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// `(context_id, query, top_k)` for each search
    pub fn queries(&self) -> Vec<(String, String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Retriever for FixedRetriever {
    async fn search(&self, context_id: &str, query: &str, top_k: usize) -> Result<Vec<String>, RetrievalError> {
        self.queries
            .lock()
            .unwrap()
            .push((context_id.to_owned(), query.to_owned(), top_k));
        Ok(self.snippets.clone())
    }
}

/// Always fails
pub struct OfflineRetriever;

#[async_trait]
impl Retriever for OfflineRetriever {
    async fn search(&self, _: &str, _: &str, _: usize) -> Result<Vec<String>, RetrievalError> {
        Err(RetrievalError("vector store offline".to_owned()))
    }
}
