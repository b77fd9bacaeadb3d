use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::EmbeddingProvider;
use crate::domain::repositories::embedding_repository::ChildHit;
use crate::domain::repositories::{ChunkRepository, DocumentRepository, EmbeddingRepository};

/// How many child hits to pull before collapsing them onto parents. Several
/// children of the same parent often rank together, so matching only k would
/// under-fill the context.
const PARENT_OVERSAMPLE: usize = 4;

#[derive(Debug)]
pub enum RetrievalError {
    ValidationError(String),
    EmbeddingError(String),
    RepositoryError(String),
}

impl std::fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetrievalError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            RetrievalError::EmbeddingError(msg) => write!(f, "Embedding error: {}", msg),
            RetrievalError::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
        }
    }
}

impl std::error::Error for RetrievalError {}

/// A parent chunk selected for the answer context, carrying the citation
/// fields the prompt needs.
#[derive(Debug, Clone)]
pub struct RetrievedPassage {
    pub parent_chunk_id: Uuid,
    pub document_id: Uuid,
    pub document_name: String,
    pub page_number: Option<i32>,
    pub text: String,
    pub score: f32,
}

/// Two-tier retrieval: similarity search runs over the small child chunks,
/// then each hit is resolved to its enclosing parent chunk, deduplicated per
/// parent with the best child score kept.
pub struct RetrievalService {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    embedding_repository: Arc<dyn EmbeddingRepository>,
    chunk_repository: Arc<dyn ChunkRepository>,
    document_repository: Arc<dyn DocumentRepository>,
}

impl RetrievalService {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        embedding_repository: Arc<dyn EmbeddingRepository>,
        chunk_repository: Arc<dyn ChunkRepository>,
        document_repository: Arc<dyn DocumentRepository>,
    ) -> Self {
        Self {
            embedding_provider,
            embedding_repository,
            chunk_repository,
            document_repository,
        }
    }

    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<RetrievedPassage>, RetrievalError> {
        if query.trim().is_empty() {
            return Err(RetrievalError::ValidationError(
                "Query cannot be empty".to_string(),
            ));
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_vector = self
            .embedding_provider
            .embed_one(query)
            .await
            .map_err(|e| RetrievalError::EmbeddingError(e.to_string()))?;

        let hits = self
            .embedding_repository
            .similarity_search(
                &query_vector,
                self.embedding_provider.model_name(),
                (k * PARENT_OVERSAMPLE) as i32,
            )
            .await
            .map_err(|e| RetrievalError::RepositoryError(e.to_string()))?;

        let ranked: Vec<ChildHit> = collapse_to_parents(hits).into_iter().take(k).collect();
        if ranked.is_empty() {
            return Ok(Vec::new());
        }

        let parent_ids: Vec<Uuid> = ranked.iter().map(|h| h.parent_chunk_id).collect();
        let parents = self
            .chunk_repository
            .find_parents_by_ids(&parent_ids)
            .await
            .map_err(|e| RetrievalError::RepositoryError(e.to_string()))?;
        let parents_by_id: HashMap<Uuid, _> =
            parents.into_iter().map(|p| (p.id(), p)).collect();

        let mut document_names: HashMap<Uuid, String> = HashMap::new();
        let mut passages = Vec::with_capacity(ranked.len());

        for hit in ranked {
            let Some(parent) = parents_by_id.get(&hit.parent_chunk_id) else {
                tracing::warn!(
                    "Child hit {} references missing parent chunk {}",
                    hit.child_chunk_id,
                    hit.parent_chunk_id
                );
                continue;
            };

            let document_name = match document_names.get(&hit.document_id) {
                Some(name) => name.clone(),
                None => {
                    let name = self
                        .document_repository
                        .find_by_id(hit.document_id)
                        .await
                        .map_err(|e| RetrievalError::RepositoryError(e.to_string()))?
                        .map(|d| d.file_name().to_string())
                        .unwrap_or_else(|| "document inconnu".to_string());
                    document_names.insert(hit.document_id, name.clone());
                    name
                }
            };

            passages.push(RetrievedPassage {
                parent_chunk_id: parent.id(),
                document_id: hit.document_id,
                document_name,
                page_number: parent.page_number(),
                text: parent.chunk_text().to_string(),
                score: hit.score,
            });
        }

        Ok(passages)
    }
}

/// Deduplicates child hits by parent chunk, keeping each parent's best child
/// score, ordered best-first.
pub fn collapse_to_parents(hits: Vec<ChildHit>) -> Vec<ChildHit> {
    let mut best: HashMap<Uuid, ChildHit> = HashMap::new();

    for hit in hits {
        match best.get(&hit.parent_chunk_id) {
            Some(existing) if existing.score >= hit.score => {}
            _ => {
                best.insert(hit.parent_chunk_id, hit);
            }
        }
    }

    let mut collapsed: Vec<ChildHit> = best.into_values().collect();
    collapsed.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(parent: Uuid, score: f32) -> ChildHit {
        ChildHit {
            child_chunk_id: Uuid::new_v4(),
            parent_chunk_id: parent,
            document_id: Uuid::new_v4(),
            score,
        }
    }

    #[test]
    fn test_collapse_keeps_best_child_per_parent() {
        let parent_a = Uuid::new_v4();
        let parent_b = Uuid::new_v4();

        let collapsed = collapse_to_parents(vec![
            hit(parent_a, 0.71),
            hit(parent_a, 0.93),
            hit(parent_b, 0.85),
            hit(parent_a, 0.40),
        ]);

        assert_eq!(collapsed.len(), 2);
        assert_eq!(collapsed[0].parent_chunk_id, parent_a);
        assert!((collapsed[0].score - 0.93).abs() < f32::EPSILON);
        assert_eq!(collapsed[1].parent_chunk_id, parent_b);
    }

    #[test]
    fn test_collapse_orders_by_score_descending() {
        let collapsed = collapse_to_parents(vec![
            hit(Uuid::new_v4(), 0.10),
            hit(Uuid::new_v4(), 0.99),
            hit(Uuid::new_v4(), 0.50),
        ]);

        let scores: Vec<f32> = collapsed.iter().map(|h| h.score).collect();
        assert_eq!(scores, vec![0.99, 0.50, 0.10]);
    }

    #[test]
    fn test_collapse_empty_input() {
        assert!(collapse_to_parents(Vec::new()).is_empty());
    }
}
