use std::sync::Arc;

use crate::application::services::RetrievalService;
use crate::application::services::retrieval_service::RetrievedPassage;

#[derive(Debug)]
pub enum SearchPassagesError {
    ValidationError(String),
    RetrievalError(String),
}

impl std::fmt::Display for SearchPassagesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchPassagesError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            SearchPassagesError::RetrievalError(msg) => write!(f, "Retrieval error: {}", msg),
        }
    }
}

impl std::error::Error for SearchPassagesError {}

#[derive(Debug, Clone)]
pub struct SearchPassagesRequest {
    pub query: String,
    pub k: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct SearchPassagesResponse {
    pub query: String,
    pub passages: Vec<RetrievedPassage>,
    pub search_time_ms: u64,
}

/// Raw retrieval without the LLM call, mainly for inspecting what the index
/// returns for a question.
pub struct SearchPassagesUseCase {
    retrieval_service: Arc<RetrievalService>,
    default_k: usize,
}

impl SearchPassagesUseCase {
    pub fn new(retrieval_service: Arc<RetrievalService>, default_k: usize) -> Self {
        Self {
            retrieval_service,
            default_k,
        }
    }

    pub async fn execute(
        &self,
        request: SearchPassagesRequest,
    ) -> Result<SearchPassagesResponse, SearchPassagesError> {
        if request.query.trim().is_empty() {
            return Err(SearchPassagesError::ValidationError(
                "Query cannot be empty".to_string(),
            ));
        }

        let k = request.k.unwrap_or(self.default_k);
        if k == 0 || k > 50 {
            return Err(SearchPassagesError::ValidationError(
                "k must be between 1 and 50".to_string(),
            ));
        }

        let start_time = std::time::Instant::now();
        let passages = self
            .retrieval_service
            .retrieve(request.query.trim(), k)
            .await
            .map_err(|e| SearchPassagesError::RetrievalError(e.to_string()))?;

        Ok(SearchPassagesResponse {
            query: request.query,
            passages,
            search_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}
