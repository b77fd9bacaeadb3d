use serde::{Deserialize, Serialize};

use crate::application::use_cases::ask_question::AskQuestionResponse;

#[derive(Debug, Deserialize)]
pub struct AskRequestDto {
    pub session_id: String,
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct AskResponseDto {
    pub session_id: String,
    pub answer: String,
    pub sources: Vec<String>,
}

impl From<AskQuestionResponse> for AskResponseDto {
    fn from(response: AskQuestionResponse) -> Self {
        Self {
            session_id: response.session_id,
            answer: response.answer,
            sources: response.sources,
        }
    }
}
