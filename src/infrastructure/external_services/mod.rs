pub mod local_embeddings;
pub mod openai_client;
pub mod pdf_extractor;

pub use local_embeddings::{LocalEmbeddingProvider, LocalEmbeddingsConfig};
pub use openai_client::{OpenAiChatModel, OpenAiClient, OpenAiClientConfig, OpenAiEmbeddingProvider};
pub use pdf_extractor::PdfExtractor;
