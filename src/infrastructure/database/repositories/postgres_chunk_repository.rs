use async_trait::async_trait;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::entities::{ChildChunk, ParentChunk};
use crate::domain::repositories::chunk_repository::{ChunkRepository, ChunkRepositoryError};
use crate::infrastructure::database::models::{
    NewChildChunkModel, NewParentChunkModel, ParentChunkModel,
};
use crate::infrastructure::database::schema::{child_chunks, parent_chunks};
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresChunkRepository {
    pool: DbPool,
}

impl PostgresChunkRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChunkRepository for PostgresChunkRepository {
    async fn save_parents(&self, parents: &[ParentChunk]) -> Result<(), ChunkRepositoryError> {
        if parents.is_empty() {
            return Ok(());
        }

        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        let models: Vec<NewParentChunkModel> =
            parents.iter().map(NewParentChunkModel::from).collect();

        diesel::insert_into(parent_chunks::table)
            .values(&models)
            .execute(&mut conn)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn save_children(&self, children: &[ChildChunk]) -> Result<(), ChunkRepositoryError> {
        if children.is_empty() {
            return Ok(());
        }

        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        let models: Vec<NewChildChunkModel> =
            children.iter().map(NewChildChunkModel::from).collect();

        diesel::insert_into(child_chunks::table)
            .values(&models)
            .execute(&mut conn)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_parents_by_ids(
        &self,
        parent_ids: &[Uuid],
    ) -> Result<Vec<ParentChunk>, ChunkRepositoryError> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        let models = parent_chunks::table
            .filter(parent_chunks::id.eq_any(parent_ids))
            .load::<ParentChunkModel>(&mut conn)
            .map_err(|e| ChunkRepositoryError::DatabaseError(e.to_string()))?;

        Ok(models.into_iter().map(ParentChunk::from).collect())
    }
}
