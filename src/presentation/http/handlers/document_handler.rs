use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::application::use_cases::ingest_course_materials::IngestCourseMaterialsUseCase;
use crate::application::use_cases::list_documents::ListDocumentsUseCase;
use crate::presentation::http::dto::{
    ApiResponse, DocumentDto, DocumentListDto, IndexReportDto,
};

pub struct DocumentHandler {
    list_documents_use_case: Arc<ListDocumentsUseCase>,
    ingest_use_case: Arc<IngestCourseMaterialsUseCase>,
}

impl DocumentHandler {
    pub fn new(
        list_documents_use_case: Arc<ListDocumentsUseCase>,
        ingest_use_case: Arc<IngestCourseMaterialsUseCase>,
    ) -> Self {
        Self {
            list_documents_use_case,
            ingest_use_case,
        }
    }

    pub async fn list_documents(
        State(handler): State<Arc<DocumentHandler>>,
    ) -> impl IntoResponse {
        match handler.list_documents_use_case.execute().await {
            Ok(documents) => {
                let dtos: Vec<DocumentDto> = documents.iter().map(DocumentDto::from).collect();
                let list = DocumentListDto {
                    total: dtos.len(),
                    documents: dtos,
                };
                (StatusCode::OK, Json(ApiResponse::success(list)))
            }
            Err(e) => {
                tracing::error!("Listing documents failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "LIST_FAILED",
                        "Impossible de lister les documents",
                    )),
                )
            }
        }
    }

    pub async fn reindex(State(handler): State<Arc<DocumentHandler>>) -> impl IntoResponse {
        let report = handler.ingest_use_case.execute().await;
        (
            StatusCode::OK,
            Json(ApiResponse::success(IndexReportDto::from(report))),
        )
    }
}
