pub mod chat_dto;
pub mod document_dto;
pub mod profile_dto;
pub mod response_dto;
pub mod search_dto;

pub use chat_dto::{AskRequestDto, AskResponseDto};
pub use document_dto::{DocumentDto, DocumentListDto, IndexReportDto};
pub use profile_dto::ProfileDto;
pub use response_dto::{ApiError, ApiResponse, HealthResponseDto};
pub use search_dto::{PassageDto, SearchRequestDto, SearchResponseDto};
