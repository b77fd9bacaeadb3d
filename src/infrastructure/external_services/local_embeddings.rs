use async_trait::async_trait;
use pgvector::Vector;
use reqwest::{Client, Error as ReqwestError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::embedding_provider::{EmbeddingProvider, EmbeddingProviderError};

#[derive(Serialize)]
pub struct EmbeddingsRequest {
    pub text: TextInput,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Deserialize)]
pub struct EmbeddingsResponse {
    pub embeddings: Vec<Vector>,
}

#[derive(Debug, Clone)]
pub struct LocalEmbeddingsConfig {
    pub service_url: String,
    pub model_name: String,
    pub max_retries: u32,
    pub timeout_secs: u64,
    pub backoff_factor: f64,
}

impl LocalEmbeddingsConfig {
    pub fn new(service_url: String, model_name: String) -> Self {
        Self {
            service_url,
            model_name,
            max_retries: 3,
            timeout_secs: 30,
            backoff_factor: 1.5,
        }
    }
}

#[derive(Debug)]
pub enum LocalEmbeddingsError {
    RequestError(String),
    ParseError(String),
    MaxRetriesExceeded,
}

/// Client for the local sentence-transformers inference service. Used when
/// the deployment avoids sending course text to a hosted embeddings API.
pub struct LocalEmbeddingProvider {
    client: Client,
    config: LocalEmbeddingsConfig,
}

impl LocalEmbeddingProvider {
    pub fn new(config: LocalEmbeddingsConfig) -> Result<Self, ReqwestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    async fn send_request(
        &self,
        request: EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, LocalEmbeddingsError> {
        let mut attempts = 0;
        let mut last_error = None;

        loop {
            attempts += 1;

            match self.execute_request(&request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    last_error = Some(e);

                    if attempts > self.config.max_retries {
                        break;
                    }

                    let backoff_time = Duration::from_millis(
                        (self.config.backoff_factor.powi(attempts as i32 - 1) * 1000.0) as u64,
                    );

                    tokio::time::sleep(backoff_time).await;
                }
            }
        }

        Err(last_error.unwrap_or(LocalEmbeddingsError::MaxRetriesExceeded))
    }

    async fn execute_request(
        &self,
        request: &EmbeddingsRequest,
    ) -> Result<EmbeddingsResponse, LocalEmbeddingsError> {
        let response = self
            .client
            .post(&self.config.service_url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| LocalEmbeddingsError::RequestError(e.without_url().to_string()))?;

        response
            .json::<EmbeddingsResponse>()
            .await
            .map_err(|e| LocalEmbeddingsError::ParseError(e.to_string()))
    }
}

fn map_error(error: LocalEmbeddingsError) -> EmbeddingProviderError {
    match error {
        LocalEmbeddingsError::RequestError(msg) => EmbeddingProviderError::NetworkError(msg),
        LocalEmbeddingsError::ParseError(msg) => EmbeddingProviderError::ApiError(msg),
        LocalEmbeddingsError::MaxRetriesExceeded => EmbeddingProviderError::ServiceUnavailable,
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbeddingProvider {
    async fn embed_one(&self, text: &str) -> Result<Vector, EmbeddingProviderError> {
        if text.trim().is_empty() {
            return Err(EmbeddingProviderError::InvalidInput(
                "Cannot embed empty text".to_string(),
            ));
        }

        let request = EmbeddingsRequest {
            text: TextInput::Single(text.to_string()),
        };

        let mut response = self.send_request(request).await.map_err(map_error)?;

        if response.embeddings.is_empty() {
            return Err(EmbeddingProviderError::ApiError(
                "No embeddings returned".to_string(),
            ));
        }

        Ok(response.embeddings.remove(0))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>, EmbeddingProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingsRequest {
            text: TextInput::Multiple(texts.to_vec()),
        };

        let response = self.send_request(request).await.map_err(map_error)?;

        if response.embeddings.len() != texts.len() {
            return Err(EmbeddingProviderError::ApiError(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                response.embeddings.len()
            )));
        }

        Ok(response.embeddings)
    }

    fn model_name(&self) -> &str {
        &self.config.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_construction() {
        let single_request = EmbeddingsRequest {
            text: TextInput::Single("Bonjour".to_string()),
        };

        assert!(matches!(single_request.text, TextInput::Single(_)));

        let multiple_request = EmbeddingsRequest {
            text: TextInput::Multiple(vec!["un".to_string(), "deux".to_string()]),
        };

        if let TextInput::Multiple(texts) = multiple_request.text {
            assert_eq!(texts.len(), 2);
        } else {
            panic!("expected batch input");
        }
    }

    #[test]
    fn test_single_input_serializes_as_plain_string() {
        let request = EmbeddingsRequest {
            text: TextInput::Single("Bonjour".to_string()),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["text"], "Bonjour");
    }
}
