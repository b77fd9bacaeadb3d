use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::search_passages::{
    SearchPassagesError, SearchPassagesRequest, SearchPassagesUseCase,
};
use crate::presentation::http::dto::{ApiResponse, SearchRequestDto, SearchResponseDto};

pub struct SearchHandler {
    search_use_case: Arc<SearchPassagesUseCase>,
}

impl SearchHandler {
    pub fn new(search_use_case: Arc<SearchPassagesUseCase>) -> Self {
        Self { search_use_case }
    }

    pub async fn search_passages(
        State(handler): State<Arc<SearchHandler>>,
        Query(params): Query<SearchRequestDto>,
    ) -> impl IntoResponse {
        let request = SearchPassagesRequest {
            query: params.query,
            k: params.k,
        };

        match handler.search_use_case.execute(request).await {
            Ok(response) => (
                StatusCode::OK,
                Json(ApiResponse::success(SearchResponseDto::from(response))),
            ),
            Err(SearchPassagesError::ValidationError(msg)) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("INVALID_REQUEST", msg)),
            ),
            Err(e) => {
                tracing::error!("Passage search failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "SEARCH_FAILED",
                        "La recherche a échoué",
                    )),
                )
            }
        }
    }
}
