pub mod ask_question;
pub mod get_student_profile;
pub mod ingest_course_materials;
pub mod list_documents;
pub mod search_passages;

pub use ask_question::AskQuestionUseCase;
pub use get_student_profile::GetStudentProfileUseCase;
pub use ingest_course_materials::IngestCourseMaterialsUseCase;
pub use list_documents::ListDocumentsUseCase;
pub use search_passages::SearchPassagesUseCase;
