use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::application::services::indexing_service::IndexReport;
use crate::domain::entities::Document;

#[derive(Debug, Serialize)]
pub struct DocumentDto {
    pub id: Uuid,
    pub file_name: String,
    pub file_size: Option<i64>,
    pub page_count: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Document> for DocumentDto {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id(),
            file_name: document.file_name().to_string(),
            file_size: document.file_size(),
            page_count: document.page_count(),
            status: document.status().as_str().to_string(),
            created_at: document.created_at(),
            updated_at: document.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DocumentListDto {
    pub documents: Vec<DocumentDto>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct IndexReportDto {
    pub scanned: usize,
    pub indexed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub parent_chunks: usize,
    pub child_chunks: usize,
}

impl From<IndexReport> for IndexReportDto {
    fn from(report: IndexReport) -> Self {
        Self {
            scanned: report.scanned,
            indexed: report.indexed,
            skipped: report.skipped,
            failed: report.failed,
            parent_chunks: report.parent_chunks,
            child_chunks: report.child_chunks,
        }
    }
}
