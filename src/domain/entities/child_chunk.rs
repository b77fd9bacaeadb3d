use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Small chunk embedded for matching precision. `start_offset` is relative to
/// the parent chunk text, not to the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildChunk {
    id: Uuid,
    parent_chunk_id: Uuid,
    document_id: Uuid,
    chunk_text: String,
    chunk_index: i32,
    start_offset: i32,
    created_at: DateTime<Utc>,
}

impl ChildChunk {
    pub fn new(
        parent_chunk_id: Uuid,
        document_id: Uuid,
        chunk_text: String,
        chunk_index: i32,
        start_offset: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            parent_chunk_id,
            document_id,
            chunk_text,
            chunk_index,
            start_offset,
            created_at: Utc::now(),
        }
    }

    pub fn restore(
        id: Uuid,
        parent_chunk_id: Uuid,
        document_id: Uuid,
        chunk_text: String,
        chunk_index: i32,
        start_offset: i32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            parent_chunk_id,
            document_id,
            chunk_text,
            chunk_index,
            start_offset,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn parent_chunk_id(&self) -> Uuid {
        self.parent_chunk_id
    }

    pub fn document_id(&self) -> Uuid {
        self.document_id
    }

    pub fn chunk_text(&self) -> &str {
        &self.chunk_text
    }

    pub fn chunk_index(&self) -> i32 {
        self.chunk_index
    }

    pub fn start_offset(&self) -> i32 {
        self.start_offset
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Chunks below a few words carry no signal worth embedding.
    pub fn is_embeddable(&self) -> bool {
        self.chunk_text.split_whitespace().count() >= 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_points_at_parent() {
        let parent_id = Uuid::new_v4();
        let document_id = Uuid::new_v4();
        let chunk = ChildChunk::new(parent_id, document_id, "un petit chunk".to_string(), 2, 64);

        assert_eq!(chunk.parent_chunk_id(), parent_id);
        assert_eq!(chunk.document_id(), document_id);
        assert_eq!(chunk.chunk_index(), 2);
        assert!(chunk.is_embeddable());
    }

    #[test]
    fn test_tiny_chunk_not_embeddable() {
        let chunk = ChildChunk::new(Uuid::new_v4(), Uuid::new_v4(), "ok".to_string(), 0, 0);
        assert!(!chunk.is_embeddable());
    }
}
