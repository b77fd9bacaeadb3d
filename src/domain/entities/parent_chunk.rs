use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Large context-bearing chunk returned to the prompt. Retrieval matches on
/// the smaller child chunks nested inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentChunk {
    id: Uuid,
    document_id: Uuid,
    chunk_text: String,
    chunk_index: i32,
    start_offset: i32,
    page_number: Option<i32>,
    created_at: DateTime<Utc>,
}

impl ParentChunk {
    pub fn new(
        document_id: Uuid,
        chunk_text: String,
        chunk_index: i32,
        start_offset: i32,
        page_number: Option<i32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            document_id,
            chunk_text,
            chunk_index,
            start_offset,
            page_number,
            created_at: Utc::now(),
        }
    }

    pub fn restore(
        id: Uuid,
        document_id: Uuid,
        chunk_text: String,
        chunk_index: i32,
        start_offset: i32,
        page_number: Option<i32>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            document_id,
            chunk_text,
            chunk_index,
            start_offset,
            page_number,
            created_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
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

    pub fn page_number(&self) -> Option<i32> {
        self.page_number
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_empty(&self) -> bool {
        self.chunk_text.trim().is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.chunk_text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_chunk_creation() {
        let document_id = Uuid::new_v4();
        let chunk = ParentChunk::new(
            document_id,
            "La tokenization découpe un texte en unités.".to_string(),
            0,
            120,
            Some(3),
        );

        assert_eq!(chunk.document_id(), document_id);
        assert_eq!(chunk.start_offset(), 120);
        assert_eq!(chunk.page_number(), Some(3));
        assert!(!chunk.is_empty());
        assert_eq!(chunk.word_count(), 7);
    }

    #[test]
    fn test_blank_chunk_is_empty() {
        let chunk = ParentChunk::new(Uuid::new_v4(), "  \n ".to_string(), 0, 0, None);
        assert!(chunk.is_empty());
    }
}
