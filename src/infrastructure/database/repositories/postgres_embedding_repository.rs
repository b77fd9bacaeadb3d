use async_trait::async_trait;
use diesel::prelude::*;
use pgvector::{Vector, VectorExpressionMethods};
use uuid::Uuid;

use crate::domain::entities::Embedding;
use crate::domain::repositories::embedding_repository::{
    ChildHit, EmbeddingRepository, EmbeddingRepositoryError,
};
use crate::infrastructure::database::models::NewEmbeddingModel;
use crate::infrastructure::database::schema::{child_chunks, embeddings};
use crate::infrastructure::database::{DbPool, get_connection_from_pool};

pub struct PostgresEmbeddingRepository {
    pool: DbPool,
}

impl PostgresEmbeddingRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmbeddingRepository for PostgresEmbeddingRepository {
    async fn save_batch(&self, batch: &[Embedding]) -> Result<(), EmbeddingRepositoryError> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| EmbeddingRepositoryError::DatabaseError(e.to_string()))?;

        let models: Vec<NewEmbeddingModel> = batch.iter().map(NewEmbeddingModel::from).collect();

        diesel::insert_into(embeddings::table)
            .values(&models)
            .execute(&mut conn)
            .map_err(|e| EmbeddingRepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn similarity_search(
        &self,
        query: &Vector,
        model_name: &str,
        limit: i32,
    ) -> Result<Vec<ChildHit>, EmbeddingRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| EmbeddingRepositoryError::DatabaseError(e.to_string()))?;

        let rows: Vec<(Uuid, Uuid, Uuid, f64)> = embeddings::table
            .inner_join(child_chunks::table)
            .filter(embeddings::model_name.eq(model_name))
            .select((
                child_chunks::id,
                child_chunks::parent_chunk_id,
                child_chunks::document_id,
                embeddings::embedding.cosine_distance(query.clone()),
            ))
            .order(embeddings::embedding.cosine_distance(query.clone()))
            .limit(limit as i64)
            .load(&mut conn)
            .map_err(|e| EmbeddingRepositoryError::DatabaseError(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|(child_id, parent_id, doc_id, distance)| ChildHit {
                child_chunk_id: child_id,
                parent_chunk_id: parent_id,
                document_id: doc_id,
                score: 1.0 - distance as f32,
            })
            .collect())
    }

    async fn model_names_for_document(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<String>, EmbeddingRepositoryError> {
        let mut conn = get_connection_from_pool(&self.pool)
            .map_err(|e| EmbeddingRepositoryError::DatabaseError(e.to_string()))?;

        embeddings::table
            .inner_join(child_chunks::table)
            .filter(child_chunks::document_id.eq(document_id))
            .select(embeddings::model_name)
            .distinct()
            .load(&mut conn)
            .map_err(|e| EmbeddingRepositoryError::DatabaseError(e.to_string()))
    }
}
