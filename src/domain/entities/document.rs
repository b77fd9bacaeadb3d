use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{ContentHash, IndexingStatus};

/// One PDF from the course-material directory, tracked through the
/// indexing lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: Uuid,
    file_path: String,
    file_name: String,
    file_size: Option<i64>,
    content_hash: ContentHash,
    page_count: Option<i32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    status: IndexingStatus,
}

impl Document {
    pub fn new(
        file_path: String,
        file_name: String,
        file_size: Option<i64>,
        content_hash: ContentHash,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            file_path,
            file_name,
            file_size,
            content_hash,
            page_count: None,
            created_at: now,
            updated_at: now,
            status: IndexingStatus::Pending,
        }
    }

    /// Rebuilds a document from persisted state, keeping its original id.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        file_path: String,
        file_name: String,
        file_size: Option<i64>,
        content_hash: ContentHash,
        page_count: Option<i32>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        status: IndexingStatus,
    ) -> Self {
        Self {
            id,
            file_path,
            file_name,
            file_size,
            content_hash,
            page_count,
            created_at,
            updated_at,
            status,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn file_size(&self) -> Option<i64> {
        self.file_size
    }

    pub fn content_hash(&self) -> &ContentHash {
        &self.content_hash
    }

    pub fn page_count(&self) -> Option<i32> {
        self.page_count
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn status(&self) -> &IndexingStatus {
        &self.status
    }

    pub fn start_indexing(&mut self) -> Result<(), String> {
        match self.status {
            IndexingStatus::Pending => {
                self.status = IndexingStatus::Indexing;
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err("Document is not in pending state".to_string()),
        }
    }

    pub fn complete_indexing(&mut self, page_count: i32) -> Result<(), String> {
        match self.status {
            IndexingStatus::Indexing => {
                self.status = IndexingStatus::Indexed;
                self.page_count = Some(page_count);
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err("Document is not being indexed".to_string()),
        }
    }

    pub fn fail_indexing(&mut self, error: String) -> Result<(), String> {
        match self.status {
            IndexingStatus::Indexing => {
                self.status = IndexingStatus::Failed(error);
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => Err("Document is not being indexed".to_string()),
        }
    }

    pub fn is_indexed(&self) -> bool {
        matches!(self.status, IndexingStatus::Indexed)
    }

    /// Same bytes on disk as when this document was last indexed.
    pub fn matches_content(&self, hash: &ContentHash) -> bool {
        &self.content_hash == hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document::new(
            "./data/cours_nlp_chap1.pdf".to_string(),
            "cours_nlp_chap1.pdf".to_string(),
            Some(2048),
            ContentHash::from_bytes(b"chapitre 1"),
        )
    }

    #[test]
    fn test_indexing_workflow() {
        let mut doc = sample();
        assert_eq!(doc.status(), &IndexingStatus::Pending);

        assert!(doc.start_indexing().is_ok());
        assert_eq!(doc.status(), &IndexingStatus::Indexing);

        assert!(doc.complete_indexing(42).is_ok());
        assert!(doc.is_indexed());
        assert_eq!(doc.page_count(), Some(42));
    }

    #[test]
    fn test_indexing_failure() {
        let mut doc = sample();
        doc.start_indexing().unwrap();
        assert!(doc.fail_indexing("extraction failed".to_string()).is_ok());

        match doc.status() {
            IndexingStatus::Failed(msg) => assert_eq!(msg, "extraction failed"),
            other => panic!("expected failed status, got {:?}", other),
        }
    }

    #[test]
    fn test_cannot_complete_before_start() {
        let mut doc = sample();
        assert!(doc.complete_indexing(1).is_err());
    }

    #[test]
    fn test_content_match() {
        let doc = sample();
        assert!(doc.matches_content(&ContentHash::from_bytes(b"chapitre 1")));
        assert!(!doc.matches_content(&ContentHash::from_bytes(b"chapitre 2")));
    }
}
