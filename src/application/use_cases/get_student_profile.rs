use std::sync::Arc;

use crate::application::ports::ProfileStore;
use crate::domain::entities::StudentProfile;

#[derive(Debug)]
pub enum GetStudentProfileError {
    ValidationError(String),
    StoreError(String),
}

impl std::fmt::Display for GetStudentProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetStudentProfileError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            GetStudentProfileError::StoreError(msg) => write!(f, "Store error: {}", msg),
        }
    }
}

impl std::error::Error for GetStudentProfileError {}

pub struct GetStudentProfileUseCase {
    profile_store: Arc<dyn ProfileStore>,
}

impl GetStudentProfileUseCase {
    pub fn new(profile_store: Arc<dyn ProfileStore>) -> Self {
        Self { profile_store }
    }

    pub async fn execute(
        &self,
        student_id: &str,
    ) -> Result<StudentProfile, GetStudentProfileError> {
        if student_id.trim().is_empty() {
            return Err(GetStudentProfileError::ValidationError(
                "Student id cannot be empty".to_string(),
            ));
        }

        self.profile_store
            .load_profile(student_id)
            .await
            .map_err(|e| GetStudentProfileError::StoreError(e.to_string()))
    }
}
