pub mod chat_handler;
pub mod document_handler;
pub mod profile_handler;
pub mod search_handler;

pub use chat_handler::ChatHandler;
pub use document_handler::DocumentHandler;
pub use profile_handler::ProfileHandler;
pub use search_handler::SearchHandler;
