use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::ports::chat_model::{ChatModel, ChatTurn};
use crate::application::ports::{ProfileStore, profile_store::ProfileStoreError};
use crate::application::prompts::{render_profile_extract_prompt, render_summary_prompt};
use crate::domain::entities::{ChatMessage, MessageRole, StudentProfile};

#[derive(Debug)]
pub enum MemoryError {
    StoreError(String),
    ModelError(String),
    ParseError(String),
}

impl std::fmt::Display for MemoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemoryError::StoreError(msg) => write!(f, "Store error: {}", msg),
            MemoryError::ModelError(msg) => write!(f, "Model error: {}", msg),
            MemoryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for MemoryError {}

impl From<ProfileStoreError> for MemoryError {
    fn from(e: ProfileStoreError) -> Self {
        MemoryError::StoreError(e.to_string())
    }
}

/// What the answering flow sees of a session: the rolling summary of pruned
/// turns plus the still-buffered recent messages.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub summary: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Default)]
struct SessionMemory {
    summary: String,
    messages: Vec<ChatMessage>,
}

/// Summary-buffer conversation memory, session-scoped by student id. Recent
/// turns stay verbatim in memory; once the buffer exceeds its character
/// budget the oldest turns are folded into a rolling summary via the LLM and
/// the summary is persisted so the next process start can seed from it.
pub struct MemoryService {
    chat_model: Arc<dyn ChatModel>,
    profile_store: Arc<dyn ProfileStore>,
    buffer_chars: usize,
    sessions: Mutex<HashMap<String, SessionMemory>>,
}

impl MemoryService {
    pub fn new(
        chat_model: Arc<dyn ChatModel>,
        profile_store: Arc<dyn ProfileStore>,
        buffer_chars: usize,
    ) -> Self {
        Self {
            chat_model,
            profile_store,
            buffer_chars,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Current summary and buffered messages for a session, seeding a new
    /// session from the student's persisted summary.
    pub async fn session_context(&self, session_id: &str) -> Result<SessionSnapshot, MemoryError> {
        let mut sessions = self.sessions.lock().await;

        if !sessions.contains_key(session_id) {
            let summary = self.profile_store.load_summary(session_id).await?;
            sessions.insert(
                session_id.to_string(),
                SessionMemory {
                    summary,
                    messages: Vec::new(),
                },
            );
        }

        let session = &sessions[session_id];
        Ok(SessionSnapshot {
            summary: session.summary.clone(),
            messages: session.messages.clone(),
        })
    }

    /// Appends a question/answer pair, pruning the buffer into the rolling
    /// summary when it outgrows its budget. A failed summarization keeps the
    /// buffer intact and is retried on the next exchange.
    ///
    /// The session lock is never held across the summarization call: the
    /// pruned turns and current summary are taken under the lock, the LLM
    /// runs unlocked, and the lock is reacquired to swap the result in.
    pub async fn record_exchange(
        &self,
        session_id: &str,
        question: &str,
        answer: &str,
    ) -> Result<(), MemoryError> {
        let (pruned, prior_summary) = {
            let mut sessions = self.sessions.lock().await;
            let session = sessions.entry(session_id.to_string()).or_default();

            session.messages.push(ChatMessage::student(question));
            session.messages.push(ChatMessage::assistant(answer));

            let total: usize = session.messages.iter().map(ChatMessage::char_len).sum();
            if total <= self.buffer_chars {
                return Ok(());
            }

            let keep_from = prune_point(&session.messages, self.buffer_chars / 2);
            if keep_from == 0 {
                return Ok(());
            }

            let pruned: Vec<ChatMessage> = session.messages.drain(..keep_from).collect();
            (pruned, session.summary.clone())
        };

        let transcript = format_transcript(&pruned);
        let prompt = render_summary_prompt(&prior_summary, &transcript);

        match self.chat_model.complete(&[ChatTurn::user(prompt)]).await {
            Ok(new_summary) => {
                let new_summary = new_summary.trim().to_string();
                {
                    let mut sessions = self.sessions.lock().await;
                    let session = sessions.entry(session_id.to_string()).or_default();
                    session.summary = new_summary.clone();
                }
                self.profile_store
                    .save_summary(session_id, &new_summary)
                    .await?;
            }
            Err(e) => {
                tracing::warn!("Summarization failed for session {}: {}", session_id, e);
                // put the pruned turns back, oldest first
                let mut sessions = self.sessions.lock().await;
                let session = sessions.entry(session_id.to_string()).or_default();
                for (i, message) in pruned.into_iter().enumerate() {
                    session.messages.insert(i, message);
                }
            }
        }

        Ok(())
    }

    /// Extracts stable facts from a student message, merges them into the
    /// persisted profile, and returns the merged profile.
    pub async fn extract_profile_facts(
        &self,
        session_id: &str,
        student_message: &str,
    ) -> Result<StudentProfile, MemoryError> {
        let prompt = render_profile_extract_prompt(student_message);
        let raw = self
            .chat_model
            .complete(&[ChatTurn::user(prompt)])
            .await
            .map_err(|e| MemoryError::ModelError(e.to_string()))?;

        let update = parse_profile_json(&raw).map_err(MemoryError::ParseError)?;
        if update.is_empty() {
            return Ok(self.profile_store.load_profile(session_id).await?);
        }

        let mut profile = self.profile_store.load_profile(session_id).await?;
        profile.merge(update);
        self.profile_store.save_profile(session_id, &profile).await?;

        Ok(profile)
    }
}

/// First index to keep so the kept suffix stays within `budget` characters.
/// Always keeps at least the last exchange.
pub fn prune_point(messages: &[ChatMessage], budget: usize) -> usize {
    if messages.len() <= 2 {
        return 0;
    }

    let mut kept = 0usize;
    let mut keep_from = messages.len();

    for (i, message) in messages.iter().enumerate().rev() {
        if kept + message.char_len() > budget && keep_from < messages.len() {
            break;
        }
        kept += message.char_len();
        keep_from = i;
    }

    // Keep whole exchanges: never split a question from its answer.
    keep_from.min(messages.len() - 2) & !1
}

pub fn format_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| match m.role {
            MessageRole::Student => format!("Étudiant: {}", m.content),
            MessageRole::Assistant => format!("Assistant: {}", m.content),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The extraction prompt asks for bare JSON, but models frequently wrap it
/// in code fences or prose. Pull out the outermost object before parsing.
pub fn parse_profile_json(raw: &str) -> Result<StudentProfile, String> {
    let object = Regex::new(r"(?s)\{.*\}")
        .expect("valid regex")
        .find(raw)
        .map(|m| m.as_str())
        .ok_or_else(|| format!("No JSON object in model output: {}", raw.trim()))?;

    serde_json::from_str(object).map_err(|e| format!("Invalid profile JSON: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use std::time::{Duration, Instant};

    use crate::application::ports::chat_model::ChatModelError;

    fn exchange(q: &str, a: &str) -> Vec<ChatMessage> {
        vec![ChatMessage::student(q), ChatMessage::assistant(a)]
    }

    struct StubChatModel {
        reply: Result<String, String>,
        delay: Duration,
    }

    impl StubChatModel {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                delay: Duration::ZERO,
            })
        }

        fn slow(reply: &str, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                delay,
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                delay: Duration::ZERO,
            })
        }
    }

    #[async_trait]
    impl ChatModel for StubChatModel {
        async fn complete(&self, _turns: &[ChatTurn]) -> Result<String, ChatModelError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply
                .clone()
                .map_err(|msg| ChatModelError::ApiError(msg))
        }
    }

    #[derive(Default)]
    struct InMemoryProfileStore {
        summaries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl ProfileStore for InMemoryProfileStore {
        async fn load_profile(
            &self,
            _student_id: &str,
        ) -> Result<StudentProfile, ProfileStoreError> {
            Ok(StudentProfile::default())
        }

        async fn save_profile(
            &self,
            _student_id: &str,
            _profile: &StudentProfile,
        ) -> Result<(), ProfileStoreError> {
            Ok(())
        }

        async fn load_summary(&self, student_id: &str) -> Result<String, ProfileStoreError> {
            Ok(self
                .summaries
                .lock()
                .await
                .get(student_id)
                .cloned()
                .unwrap_or_default())
        }

        async fn save_summary(
            &self,
            student_id: &str,
            summary: &str,
        ) -> Result<(), ProfileStoreError> {
            self.summaries
                .lock()
                .await
                .insert(student_id.to_string(), summary.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_record_exchange_prunes_and_persists_summary() {
        let store = Arc::new(InMemoryProfileStore::default());
        let service = MemoryService::new(
            StubChatModel::replying("résumé des tours précédents"),
            store.clone(),
            40,
        );

        service
            .record_exchange("etu-1", "première question un peu longue", "première réponse")
            .await
            .unwrap();
        service
            .record_exchange("etu-1", "deuxième question", "deuxième réponse")
            .await
            .unwrap();

        let snapshot = service.session_context("etu-1").await.unwrap();
        assert_eq!(snapshot.summary, "résumé des tours précédents");
        // only the most recent exchange survives in the buffer
        assert_eq!(snapshot.messages.len(), 2);
        assert_eq!(snapshot.messages[0].content, "deuxième question");

        let persisted = store.load_summary("etu-1").await.unwrap();
        assert_eq!(persisted, "résumé des tours précédents");
    }

    #[tokio::test]
    async fn test_failed_summarization_keeps_buffer_intact() {
        let service = MemoryService::new(
            StubChatModel::failing("indisponible"),
            Arc::new(InMemoryProfileStore::default()),
            40,
        );

        service
            .record_exchange("etu-1", "première question un peu longue", "première réponse")
            .await
            .unwrap();
        service
            .record_exchange("etu-1", "deuxième question", "deuxième réponse")
            .await
            .unwrap();

        let snapshot = service.session_context("etu-1").await.unwrap();
        assert_eq!(snapshot.summary, "");
        // all four messages are back, oldest first, ready for a retry
        assert_eq!(snapshot.messages.len(), 4);
        assert_eq!(snapshot.messages[0].content, "première question un peu longue");
    }

    #[tokio::test]
    async fn test_summarization_does_not_block_other_sessions() {
        let service = Arc::new(MemoryService::new(
            StubChatModel::slow("résumé", Duration::from_millis(500)),
            Arc::new(InMemoryProfileStore::default()),
            20,
        ));

        service
            .record_exchange("etu-a", "première question", "première réponse")
            .await
            .unwrap();

        let busy = service.clone();
        let handle = tokio::spawn(async move {
            busy.record_exchange("etu-a", "deuxième question", "deuxième réponse")
                .await
        });

        // let the spawned exchange reach its summarization call
        tokio::time::sleep(Duration::from_millis(100)).await;

        let start = Instant::now();
        service.session_context("etu-b").await.unwrap();
        assert!(
            start.elapsed() < Duration::from_millis(250),
            "another session waited on a summarization in flight"
        );

        handle.await.unwrap().unwrap();
    }

    #[test]
    fn test_prune_point_keeps_recent_exchanges() {
        let mut messages = exchange("q1 assez longue pour compter", "r1 assez longue aussi");
        messages.extend(exchange("q2", "r2"));
        messages.extend(exchange("q3", "r3"));

        let keep_from = prune_point(&messages, 10);
        // the last exchange always survives, and the cut is exchange-aligned
        assert!(keep_from <= messages.len() - 2);
        assert_eq!(keep_from % 2, 0);

        let kept: usize = messages[keep_from..].iter().map(ChatMessage::char_len).sum();
        assert!(kept <= 10 || keep_from == messages.len() - 2);
    }

    #[test]
    fn test_prune_point_short_buffer_untouched() {
        let messages = exchange("bonjour", "bonjour !");
        assert_eq!(prune_point(&messages, 1), 0);
    }

    #[test]
    fn test_transcript_labels_speakers() {
        let transcript = format_transcript(&exchange("ma question", "ma réponse"));
        assert_eq!(transcript, "Étudiant: ma question\nAssistant: ma réponse");
    }

    #[test]
    fn test_parse_profile_json_plain() {
        let profile = parse_profile_json(r#"{"niveau": "master 1", "objectifs": ["examen"]}"#)
            .unwrap();
        assert_eq!(profile.niveau.as_deref(), Some("master 1"));
        assert_eq!(profile.objectifs, vec!["examen".to_string()]);
    }

    #[test]
    fn test_parse_profile_json_fenced() {
        let raw = "Voici le JSON demandé :\n```json\n{\"niveau\": null, \"difficultes\": [\"regex\"]}\n```";
        let profile = parse_profile_json(raw).unwrap();
        assert!(profile.niveau.is_none());
        assert_eq!(profile.difficultes, vec!["regex".to_string()]);
    }

    #[test]
    fn test_parse_profile_json_rejects_prose() {
        assert!(parse_profile_json("je ne peux pas répondre").is_err());
    }
}
