use std::sync::Arc;

use crate::application::services::{AnswerService, MemoryService, RetrievalService};
use crate::domain::entities::ChatMessage;

#[derive(Debug)]
pub enum AskQuestionError {
    ValidationError(String),
    RetrievalError(String),
    AnswerError(String),
    MemoryError(String),
}

impl std::fmt::Display for AskQuestionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AskQuestionError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AskQuestionError::RetrievalError(msg) => write!(f, "Retrieval error: {}", msg),
            AskQuestionError::AnswerError(msg) => write!(f, "Answer error: {}", msg),
            AskQuestionError::MemoryError(msg) => write!(f, "Memory error: {}", msg),
        }
    }
}

impl std::error::Error for AskQuestionError {}

#[derive(Debug, Clone)]
pub struct AskQuestionRequest {
    pub session_id: String,
    pub question: String,
}

#[derive(Debug, Clone)]
pub struct AskQuestionResponse {
    pub session_id: String,
    pub answer: String,
    pub sources: Vec<String>,
}

/// The main question-answering flow: retrieve course passages for the
/// question, stuff them into the tutor prompt along with the session
/// history, call the LLM, then update the session memory. Profile fact
/// extraction runs detached so a slow or failing extraction never delays
/// the answer.
pub struct AskQuestionUseCase {
    retrieval_service: Arc<RetrievalService>,
    answer_service: Arc<AnswerService>,
    memory_service: Arc<MemoryService>,
    retrieval_k: usize,
}

impl AskQuestionUseCase {
    pub fn new(
        retrieval_service: Arc<RetrievalService>,
        answer_service: Arc<AnswerService>,
        memory_service: Arc<MemoryService>,
        retrieval_k: usize,
    ) -> Self {
        Self {
            retrieval_service,
            answer_service,
            memory_service,
            retrieval_k,
        }
    }

    pub async fn execute(
        &self,
        request: AskQuestionRequest,
    ) -> Result<AskQuestionResponse, AskQuestionError> {
        let question = request.question.trim();
        if question.is_empty() {
            return Err(AskQuestionError::ValidationError(
                "Question cannot be empty".to_string(),
            ));
        }
        if request.session_id.trim().is_empty() {
            return Err(AskQuestionError::ValidationError(
                "Session id cannot be empty".to_string(),
            ));
        }

        let snapshot = self
            .memory_service
            .session_context(&request.session_id)
            .await
            .map_err(|e| AskQuestionError::MemoryError(e.to_string()))?;

        let passages = self
            .retrieval_service
            .retrieve(question, self.retrieval_k)
            .await
            .map_err(|e| AskQuestionError::RetrievalError(e.to_string()))?;

        let history = history_with_summary(&snapshot.summary, &snapshot.messages);
        let answer = self
            .answer_service
            .answer(question, &passages, &history)
            .await
            .map_err(|e| AskQuestionError::AnswerError(e.to_string()))?;

        self.memory_service
            .record_exchange(&request.session_id, question, &answer.text)
            .await
            .map_err(|e| AskQuestionError::MemoryError(e.to_string()))?;

        let memory_service = self.memory_service.clone();
        let session_id = request.session_id.clone();
        let message = question.to_string();
        tokio::spawn(async move {
            if let Err(e) = memory_service
                .extract_profile_facts(&session_id, &message)
                .await
            {
                tracing::warn!("Profile extraction failed for {}: {}", session_id, e);
            }
        });

        Ok(AskQuestionResponse {
            session_id: request.session_id,
            answer: answer.text,
            sources: answer.sources,
        })
    }
}

/// Prepends the rolling summary as an assistant turn so pruned history still
/// informs the model.
fn history_with_summary(summary: &str, messages: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut history = Vec::with_capacity(messages.len() + 1);
    if !summary.trim().is_empty() {
        history.push(ChatMessage::assistant(format!(
            "Résumé des échanges précédents : {}",
            summary.trim()
        )));
    }
    history.extend_from_slice(messages);
    history
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_includes_summary_when_present() {
        let messages = vec![ChatMessage::student("q")];
        let history = history_with_summary("l'étudiant prépare l'examen", &messages);

        assert_eq!(history.len(), 2);
        assert!(history[0].content.contains("Résumé des échanges précédents"));
        assert!(history[0].content.contains("l'étudiant prépare l'examen"));
    }

    #[test]
    fn test_history_skips_blank_summary() {
        let messages = vec![ChatMessage::student("q")];
        assert_eq!(history_with_summary("  ", &messages).len(), 1);
    }
}
