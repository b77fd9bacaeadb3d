pub mod chunk_model;
pub mod document_model;
pub mod embedding_model;

pub use chunk_model::{ChildChunkModel, NewChildChunkModel, NewParentChunkModel, ParentChunkModel};
pub use document_model::{DocumentModel, NewDocumentModel};
pub use embedding_model::{EmbeddingModel, NewEmbeddingModel};
