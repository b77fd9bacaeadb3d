pub mod answer_service;
pub mod indexing_service;
pub mod memory_service;
pub mod page_map;
pub mod retrieval_service;
pub mod text_splitter;

pub use answer_service::AnswerService;
pub use indexing_service::IndexingService;
pub use memory_service::MemoryService;
pub use retrieval_service::RetrievalService;
