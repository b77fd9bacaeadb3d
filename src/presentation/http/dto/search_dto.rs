use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::services::retrieval_service::RetrievedPassage;
use crate::application::use_cases::search_passages::SearchPassagesResponse;

#[derive(Debug, Deserialize)]
pub struct SearchRequestDto {
    pub query: String,
    pub k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponseDto {
    pub query: String,
    pub passages: Vec<PassageDto>,
    pub total_results: usize,
    pub search_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct PassageDto {
    pub parent_chunk_id: Uuid,
    pub document_id: Uuid,
    pub document_name: String,
    pub page_number: Option<i32>,
    pub text: String,
    pub score: f32,
}

impl From<RetrievedPassage> for PassageDto {
    fn from(passage: RetrievedPassage) -> Self {
        Self {
            parent_chunk_id: passage.parent_chunk_id,
            document_id: passage.document_id,
            document_name: passage.document_name,
            page_number: passage.page_number,
            text: passage.text,
            score: passage.score,
        }
    }
}

impl From<SearchPassagesResponse> for SearchResponseDto {
    fn from(response: SearchPassagesResponse) -> Self {
        let passages: Vec<PassageDto> =
            response.passages.into_iter().map(PassageDto::from).collect();
        Self {
            query: response.query,
            total_results: passages.len(),
            passages,
            search_time_ms: response.search_time_ms,
        }
    }
}
