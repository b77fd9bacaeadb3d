pub mod chat_routes;
pub mod document_routes;
pub mod health_routes;
pub mod profile_routes;
pub mod search_routes;

pub use chat_routes::*;
pub use document_routes::*;
pub use health_routes::*;
pub use profile_routes::*;
pub use search_routes::*;
