use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{ChildChunk, ParentChunk};

#[derive(Debug)]
pub enum ChunkRepositoryError {
    DatabaseError(String),
    ValidationError(String),
}

impl std::fmt::Display for ChunkRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChunkRepositoryError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ChunkRepositoryError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for ChunkRepositoryError {}

#[async_trait]
pub trait ChunkRepository: Send + Sync {
    async fn save_parents(&self, chunks: &[ParentChunk]) -> Result<(), ChunkRepositoryError>;

    async fn save_children(&self, chunks: &[ChildChunk]) -> Result<(), ChunkRepositoryError>;

    async fn find_parents_by_ids(
        &self,
        ids: &[Uuid],
    ) -> Result<Vec<ParentChunk>, ChunkRepositoryError>;
}
