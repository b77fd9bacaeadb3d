use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use std::sync::Arc;

use crate::application::use_cases::ask_question::{
    AskQuestionError, AskQuestionRequest, AskQuestionUseCase,
};
use crate::presentation::http::dto::{ApiResponse, AskRequestDto, AskResponseDto};

pub struct ChatHandler {
    ask_question_use_case: Arc<AskQuestionUseCase>,
}

impl ChatHandler {
    pub fn new(ask_question_use_case: Arc<AskQuestionUseCase>) -> Self {
        Self {
            ask_question_use_case,
        }
    }

    pub async fn ask(
        State(handler): State<Arc<ChatHandler>>,
        Json(payload): Json<AskRequestDto>,
    ) -> impl IntoResponse {
        let request = AskQuestionRequest {
            session_id: payload.session_id,
            question: payload.question,
        };

        match handler.ask_question_use_case.execute(request).await {
            Ok(response) => (
                StatusCode::OK,
                Json(ApiResponse::success(AskResponseDto::from(response))),
            ),
            Err(AskQuestionError::ValidationError(msg)) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("INVALID_REQUEST", msg)),
            ),
            Err(e) => {
                tracing::error!("Question answering failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "ANSWER_FAILED",
                        "Impossible de répondre à la question pour le moment",
                    )),
                )
            }
        }
    }
}
