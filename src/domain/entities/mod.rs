pub mod chat_message;
pub mod child_chunk;
pub mod document;
pub mod embedding;
pub mod parent_chunk;
pub mod student_profile;

pub use chat_message::{ChatMessage, MessageRole};
pub use child_chunk::ChildChunk;
pub use document::Document;
pub use embedding::Embedding;
pub use parent_chunk::ParentChunk;
pub use student_profile::StudentProfile;
