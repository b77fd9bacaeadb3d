use async_trait::async_trait;
use pgvector::Vector;
use uuid::Uuid;

use crate::domain::entities::Embedding;

#[derive(Debug)]
pub enum EmbeddingRepositoryError {
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for EmbeddingRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            EmbeddingRepositoryError::ValidationError(msg) => {
                write!(f, "Validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for EmbeddingRepositoryError {}

/// One child chunk matched by a similarity search, with enough ids attached
/// to climb back to the parent chunk and document without extra joins.
#[derive(Debug, Clone)]
pub struct ChildHit {
    pub child_chunk_id: Uuid,
    pub parent_chunk_id: Uuid,
    pub document_id: Uuid,
    /// Cosine similarity in [-1, 1], higher is closer.
    pub score: f32,
}

#[async_trait]
pub trait EmbeddingRepository: Send + Sync {
    async fn save_batch(&self, embeddings: &[Embedding]) -> Result<(), EmbeddingRepositoryError>;

    /// Nearest child chunks to `query` by cosine distance, restricted to
    /// embeddings produced by `model_name`. Vectors from other models may
    /// have a different dimension and cannot be compared against `query`.
    async fn similarity_search(
        &self,
        query: &Vector,
        model_name: &str,
        limit: i32,
    ) -> Result<Vec<ChildHit>, EmbeddingRepositoryError>;

    /// Distinct embedding models used for a document's child chunks.
    async fn model_names_for_document(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<String>, EmbeddingRepositoryError>;
}
