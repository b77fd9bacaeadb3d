use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::Document;
use crate::domain::value_objects::{ContentHash, IndexingStatus};
use crate::infrastructure::database::schema::documents;

#[derive(Debug, Clone, Queryable, Selectable, Serialize, Identifiable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DocumentModel {
    pub id: Uuid,
    pub file_path: String,
    pub file_name: String,
    pub file_size: Option<i64>,
    pub content_hash: String,
    pub page_count: Option<i32>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewDocumentModel {
    pub id: Uuid,
    pub file_path: String,
    pub file_name: String,
    pub file_size: Option<i64>,
    pub content_hash: String,
    pub page_count: Option<i32>,
    pub status: String,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Document> for NewDocumentModel {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id(),
            file_path: document.file_path().to_string(),
            file_name: document.file_name().to_string(),
            file_size: document.file_size(),
            content_hash: document.content_hash().to_string(),
            page_count: document.page_count(),
            status: document.status().as_str().to_string(),
            error_message: document.status().error_message().map(String::from),
            created_at: document.created_at(),
            updated_at: document.updated_at(),
        }
    }
}

impl TryFrom<DocumentModel> for Document {
    type Error = String;

    fn try_from(model: DocumentModel) -> Result<Self, Self::Error> {
        let hash = ContentHash::parse(model.content_hash)?;
        let status = IndexingStatus::from_db(&model.status, model.error_message);

        Ok(Document::restore(
            model.id,
            model.file_path,
            model.file_name,
            model.file_size,
            hash,
            model.page_count,
            model.created_at,
            model.updated_at,
            status,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_round_trip_keeps_identity() {
        let mut document = Document::new(
            "./data/cours.pdf".to_string(),
            "cours.pdf".to_string(),
            Some(512),
            ContentHash::from_bytes(b"bytes"),
        );
        document.start_indexing().unwrap();
        document.complete_indexing(7).unwrap();

        let model = NewDocumentModel::from(&document);
        let restored = Document::try_from(DocumentModel {
            id: model.id,
            file_path: model.file_path,
            file_name: model.file_name,
            file_size: model.file_size,
            content_hash: model.content_hash,
            page_count: model.page_count,
            status: model.status,
            error_message: model.error_message,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
        .unwrap();

        assert_eq!(restored, document);
    }
}
