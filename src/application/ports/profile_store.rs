use async_trait::async_trait;

use crate::domain::entities::StudentProfile;

#[derive(Debug)]
pub enum ProfileStoreError {
    IoError(String),
    SerializationError(String),
    InvalidStudentId(String),
}

impl std::fmt::Display for ProfileStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProfileStoreError::IoError(msg) => write!(f, "IO error: {}", msg),
            ProfileStoreError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            ProfileStoreError::InvalidStudentId(msg) => write!(f, "Invalid student id: {}", msg),
        }
    }
}

impl std::error::Error for ProfileStoreError {}

/// Per-student persistence: a `profile.json` of stable facts and a rolling
/// conversation summary, each under the student's own directory.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Missing file yields the empty default profile, never an error.
    async fn load_profile(&self, student_id: &str) -> Result<StudentProfile, ProfileStoreError>;

    async fn save_profile(
        &self,
        student_id: &str,
        profile: &StudentProfile,
    ) -> Result<(), ProfileStoreError>;

    /// Missing file yields the empty string.
    async fn load_summary(&self, student_id: &str) -> Result<String, ProfileStoreError>;

    async fn save_summary(&self, student_id: &str, summary: &str)
    -> Result<(), ProfileStoreError>;
}
