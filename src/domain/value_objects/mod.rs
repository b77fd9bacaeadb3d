pub mod content_hash;
pub mod indexing_status;

pub use content_hash::ContentHash;
pub use indexing_status::IndexingStatus;
