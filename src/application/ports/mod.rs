pub mod chat_model;
pub mod document_extractor;
pub mod embedding_provider;
pub mod profile_store;

pub use chat_model::ChatModel;
pub use document_extractor::DocumentExtractor;
pub use embedding_provider::EmbeddingProvider;
pub use profile_store::ProfileStore;
