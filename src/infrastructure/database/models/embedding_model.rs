use chrono::{DateTime, Utc};
use diesel::prelude::*;
use pgvector::Vector;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::Embedding;
use crate::infrastructure::database::schema::embeddings;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable, Associations)]
#[diesel(belongs_to(super::ChildChunkModel, foreign_key = child_chunk_id))]
#[diesel(table_name = embeddings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct EmbeddingModel {
    pub id: Uuid,
    pub child_chunk_id: Uuid,
    pub model_name: String,
    pub embedding: Vector,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = embeddings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewEmbeddingModel {
    pub id: Uuid,
    pub child_chunk_id: Uuid,
    pub model_name: String,
    pub embedding: Vector,
    pub generated_at: DateTime<Utc>,
}

impl From<&Embedding> for NewEmbeddingModel {
    fn from(embedding: &Embedding) -> Self {
        Self {
            id: embedding.id(),
            child_chunk_id: embedding.child_chunk_id(),
            model_name: embedding.model_name().to_string(),
            embedding: embedding.embedding().clone(),
            generated_at: embedding.generated_at(),
        }
    }
}

impl From<EmbeddingModel> for Embedding {
    fn from(model: EmbeddingModel) -> Self {
        Embedding::restore(
            model.id,
            model.child_chunk_id,
            model.model_name,
            model.embedding,
            model.generated_at,
        )
    }
}
