use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{ChildChunk, ParentChunk};
use crate::infrastructure::database::schema::{child_chunks, parent_chunks};

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable, Associations)]
#[diesel(belongs_to(super::DocumentModel, foreign_key = document_id))]
#[diesel(table_name = parent_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ParentChunkModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub chunk_text: String,
    pub chunk_index: i32,
    pub start_offset: i32,
    pub page_number: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = parent_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewParentChunkModel {
    pub id: Uuid,
    pub document_id: Uuid,
    pub chunk_text: String,
    pub chunk_index: i32,
    pub start_offset: i32,
    pub page_number: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl From<&ParentChunk> for NewParentChunkModel {
    fn from(chunk: &ParentChunk) -> Self {
        Self {
            id: chunk.id(),
            document_id: chunk.document_id(),
            chunk_text: chunk.chunk_text().to_string(),
            chunk_index: chunk.chunk_index(),
            start_offset: chunk.start_offset(),
            page_number: chunk.page_number(),
            created_at: chunk.created_at(),
        }
    }
}

impl From<ParentChunkModel> for ParentChunk {
    fn from(model: ParentChunkModel) -> Self {
        ParentChunk::restore(
            model.id,
            model.document_id,
            model.chunk_text,
            model.chunk_index,
            model.start_offset,
            model.page_number,
            model.created_at,
        )
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable, Associations)]
#[diesel(belongs_to(ParentChunkModel, foreign_key = parent_chunk_id))]
#[diesel(table_name = child_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChildChunkModel {
    pub id: Uuid,
    pub parent_chunk_id: Uuid,
    pub document_id: Uuid,
    pub chunk_text: String,
    pub chunk_index: i32,
    pub start_offset: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = child_chunks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewChildChunkModel {
    pub id: Uuid,
    pub parent_chunk_id: Uuid,
    pub document_id: Uuid,
    pub chunk_text: String,
    pub chunk_index: i32,
    pub start_offset: i32,
    pub created_at: DateTime<Utc>,
}

impl From<&ChildChunk> for NewChildChunkModel {
    fn from(chunk: &ChildChunk) -> Self {
        Self {
            id: chunk.id(),
            parent_chunk_id: chunk.parent_chunk_id(),
            document_id: chunk.document_id(),
            chunk_text: chunk.chunk_text().to_string(),
            chunk_index: chunk.chunk_index(),
            start_offset: chunk.start_offset(),
            created_at: chunk.created_at(),
        }
    }
}

impl From<ChildChunkModel> for ChildChunk {
    fn from(model: ChildChunkModel) -> Self {
        ChildChunk::restore(
            model.id,
            model.parent_chunk_id,
            model.document_id,
            model.chunk_text,
            model.chunk_index,
            model.start_offset,
            model.created_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_chunk_round_trip() {
        let chunk = ParentChunk::new(Uuid::new_v4(), "texte du cours".to_string(), 1, 40, Some(2));
        let model = NewParentChunkModel::from(&chunk);
        let restored = ParentChunk::from(ParentChunkModel {
            id: model.id,
            document_id: model.document_id,
            chunk_text: model.chunk_text,
            chunk_index: model.chunk_index,
            start_offset: model.start_offset,
            page_number: model.page_number,
            created_at: model.created_at,
        });

        assert_eq!(restored, chunk);
    }
}
