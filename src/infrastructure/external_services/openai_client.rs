use async_trait::async_trait;
use pgvector::Vector;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::chat_model::{ChatModel, ChatModelError, ChatRole, ChatTurn};
use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone)]
pub struct OpenAiClientConfig {
    pub api_key: String,
    pub api_base: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
}

impl OpenAiClientConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            api_base: OPENAI_API_BASE.to_string(),
            max_retries: 3,
            timeout_secs: 120,
            backoff_factor: 1.5,
        }
    }
}

#[derive(Debug)]
pub enum OpenAiError {
    RequestError(String),
    ParseError(String),
    StatusError(u16, String),
}

impl std::fmt::Display for OpenAiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpenAiError::RequestError(msg) => write!(f, "Request error: {}", msg),
            OpenAiError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            OpenAiError::StatusError(code, body) => write!(f, "HTTP {}: {}", code, body),
        }
    }
}

impl std::error::Error for OpenAiError {}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    temperature: f32,
    messages: Vec<WireMessage>,
}

#[derive(Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

impl From<&ChatTurn> for WireMessage {
    fn from(turn: &ChatTurn) -> Self {
        let role = match turn.role {
            ChatRole::System => "system",
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        };
        Self {
            role,
            content: turn.content.clone(),
        }
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingsApiRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbeddingsApiResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

/// Shared HTTP plumbing for the OpenAI REST API with retry and exponential
/// backoff. Chat and embeddings adapters below both drive this client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    config: OpenAiClientConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiClientConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    async fn post_json<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        request: &Req,
    ) -> Result<Resp, OpenAiError> {
        let mut attempts = 0;
        let mut last_error = None;

        loop {
            attempts += 1;

            match self.execute_request(endpoint, request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    // Client errors are not retryable; backing off won't fix a
                    // bad API key or a malformed request.
                    let retryable = !matches!(e, OpenAiError::StatusError(code, _) if code < 500);
                    last_error = Some(e);

                    if !retryable || attempts > self.config.max_retries {
                        break;
                    }

                    let backoff_time = Duration::from_millis(
                        (self.config.backoff_factor.powi(attempts as i32 - 1) * 1000.0) as u64,
                    );

                    tokio::time::sleep(backoff_time).await;
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| OpenAiError::RequestError("Max retries exceeded".to_string())))
    }

    async fn execute_request<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        request: &Req,
    ) -> Result<Resp, OpenAiError> {
        let url = format!("{}{}", self.config.api_base, endpoint);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| OpenAiError::RequestError(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenAiError::StatusError(status.as_u16(), body));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| OpenAiError::ParseError(e.to_string()))
    }
}

pub struct OpenAiChatModel {
    client: OpenAiClient,
    model: String,
    temperature: f32,
}

impl OpenAiChatModel {
    pub fn new(client: OpenAiClient, model: String, temperature: f32) -> Self {
        Self {
            client,
            model,
            temperature,
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, ChatModelError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            temperature: self.temperature,
            messages: turns.iter().map(WireMessage::from).collect(),
        };

        let response: ChatCompletionResponse = self
            .client
            .post_json("/chat/completions", &request)
            .await
            .map_err(|e| match e {
                OpenAiError::RequestError(msg) => ChatModelError::NetworkError(msg),
                other => ChatModelError::ApiError(other.to_string()),
            })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ChatModelError::EmptyResponse)
    }
}

pub struct OpenAiEmbeddingProvider {
    client: OpenAiClient,
    model: String,
}

impl OpenAiEmbeddingProvider {
    pub fn new(client: OpenAiClient, model: String) -> Self {
        Self { client, model }
    }

    async fn request_embeddings(
        &self,
        texts: Vec<String>,
    ) -> Result<Vec<Vector>, EmbeddingProviderError> {
        let request = EmbeddingsApiRequest {
            model: self.model.clone(),
            input: texts,
        };

        let response: EmbeddingsApiResponse = self
            .client
            .post_json("/embeddings", &request)
            .await
            .map_err(|e| match e {
                OpenAiError::RequestError(msg) => EmbeddingProviderError::NetworkError(msg),
                other => EmbeddingProviderError::ApiError(other.to_string()),
            })?;

        // The API documents no ordering guarantee; the index field is
        // authoritative.
        let mut data = response.data;
        data.sort_by_key(|d| d.index);

        Ok(data.into_iter().map(|d| Vector::from(d.embedding)).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    async fn embed_one(&self, text: &str) -> Result<Vector, EmbeddingProviderError> {
        if text.trim().is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "Cannot embed empty text".to_string(),
            ));
        }

        let mut embeddings = self.request_embeddings(vec![text.to_string()]).await?;

        if embeddings.is_empty() {
            return Err(EmbeddingProviderError::ApiError(
                "No embeddings returned".to_string(),
            ));
        }

        Ok(embeddings.remove(0))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self.request_embeddings(texts.to_vec()).await?;

        if embeddings.len() != texts.len() {
            return Err(EmbeddingProviderError::ApiError(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }

        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_serializes_roles() {
        let turns = vec![
            ChatTurn::system("Tu es un assistant."),
            ChatTurn::user("Qu'est-ce qu'un embedding ?"),
            ChatTurn::assistant("Un vecteur dense."),
        ];

        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            temperature: 1.0,
            messages: turns.iter().map(WireMessage::from).collect(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][2]["role"], "assistant");
        assert_eq!(json["messages"][1]["content"], "Qu'est-ce qu'un embedding ?");
    }

    #[test]
    fn test_embeddings_response_reordered_by_index() {
        let json = r#"{"data":[
            {"index":1,"embedding":[0.5,0.5]},
            {"index":0,"embedding":[0.1,0.2]}
        ]}"#;

        let mut response: EmbeddingsApiResponse = serde_json::from_str(json).unwrap();
        response.data.sort_by_key(|d| d.index);

        assert_eq!(response.data[0].embedding, vec![0.1, 0.2]);
        assert_eq!(response.data[1].embedding, vec![0.5, 0.5]);
    }
}
