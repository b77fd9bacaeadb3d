use std::sync::Arc;

use crate::application::ports::chat_model::{ChatModel, ChatTurn};
use crate::application::prompts::render_tutor_prompt;
use crate::application::services::retrieval_service::RetrievedPassage;
use crate::domain::entities::ChatMessage;

#[derive(Debug)]
pub enum AnswerError {
    ValidationError(String),
    ModelError(String),
}

impl std::fmt::Display for AnswerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AnswerError::ModelError(msg) => write!(f, "Model error: {}", msg),
        }
    }
}

impl std::error::Error for AnswerError {}

#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<String>,
}

/// Stuffs retrieved passages into the fixed tutor prompt and calls the chat
/// model, with the session history in between so follow-up questions keep
/// their thread.
pub struct AnswerService {
    chat_model: Arc<dyn ChatModel>,
}

impl AnswerService {
    pub fn new(chat_model: Arc<dyn ChatModel>) -> Self {
        Self { chat_model }
    }

    pub async fn answer(
        &self,
        question: &str,
        passages: &[RetrievedPassage],
        history: &[ChatMessage],
    ) -> Result<Answer, AnswerError> {
        if question.trim().is_empty() {
            return Err(AnswerError::ValidationError(
                "Question cannot be empty".to_string(),
            ));
        }

        let turns = build_turns(question, passages, history);

        let text = self
            .chat_model
            .complete(&turns)
            .await
            .map_err(|e| AnswerError::ModelError(e.to_string()))?;

        Ok(Answer {
            text,
            sources: source_labels(passages),
        })
    }
}

/// System prompt with the retrieved context, then the session history, then
/// the question as the sole final user turn. The question appears nowhere
/// else in the request.
pub fn build_turns(
    question: &str,
    passages: &[RetrievedPassage],
    history: &[ChatMessage],
) -> Vec<ChatTurn> {
    let context = format_context(passages);

    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(ChatTurn::system(render_tutor_prompt(&context)));
    turns.extend(history.iter().map(ChatTurn::from));
    turns.push(ChatTurn::user(question.to_string()));
    turns
}

pub fn format_context(passages: &[RetrievedPassage]) -> String {
    if passages.is_empty() {
        return "(aucun passage du cours n'a été trouvé)".to_string();
    }

    passages
        .iter()
        .map(|p| format!("[{}]\n{}", source_label(p), p.text))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

fn source_label(passage: &RetrievedPassage) -> String {
    match passage.page_number {
        Some(page) => format!("Source: {}, page {}", passage.document_name, page),
        None => format!("Source: {}", passage.document_name),
    }
}

pub fn source_labels(passages: &[RetrievedPassage]) -> Vec<String> {
    let mut labels = Vec::new();
    for passage in passages {
        let label = source_label(passage);
        if !labels.contains(&label) {
            labels.push(label);
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn passage(name: &str, page: Option<i32>, text: &str) -> RetrievedPassage {
        RetrievedPassage {
            parent_chunk_id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            document_name: name.to_string(),
            page_number: page,
            text: text.to_string(),
            score: 0.9,
        }
    }

    #[test]
    fn test_context_carries_sources_and_text() {
        let context = format_context(&[
            passage("cours_nlp.pdf", Some(12), "La tokenization découpe le texte."),
            passage("td_embeddings.pdf", None, "Les vecteurs denses."),
        ]);

        assert!(context.contains("[Source: cours_nlp.pdf, page 12]"));
        assert!(context.contains("La tokenization découpe le texte."));
        assert!(context.contains("[Source: td_embeddings.pdf]"));
        assert!(context.contains("---"));
    }

    #[test]
    fn test_question_appears_once_as_last_user_turn() {
        use crate::application::ports::chat_model::ChatRole;

        let question = "C'est quoi la lemmatisation ?";
        let history = vec![
            ChatMessage::student("bonjour"),
            ChatMessage::assistant("bonjour !"),
        ];
        let turns = build_turns(question, &[passage("cours_nlp.pdf", Some(4), "...")], &history);

        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, ChatRole::System);
        assert!(!turns[0].content.contains(question));

        let last = turns.last().unwrap();
        assert_eq!(last.role, ChatRole::User);
        assert_eq!(last.content, question);

        let occurrences = turns.iter().filter(|t| t.content.contains(question)).count();
        assert_eq!(occurrences, 1);
    }

    #[test]
    fn test_empty_context_placeholder() {
        let context = format_context(&[]);
        assert!(context.contains("aucun passage"));
    }

    #[test]
    fn test_source_labels_deduplicate() {
        let labels = source_labels(&[
            passage("cours_nlp.pdf", Some(3), "a"),
            passage("cours_nlp.pdf", Some(3), "b"),
            passage("cours_nlp.pdf", Some(7), "c"),
        ]);

        assert_eq!(
            labels,
            vec![
                "Source: cours_nlp.pdf, page 3".to_string(),
                "Source: cours_nlp.pdf, page 7".to_string(),
            ]
        );
    }
}
