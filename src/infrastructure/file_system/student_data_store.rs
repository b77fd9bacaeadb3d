use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::application::ports::profile_store::{ProfileStore, ProfileStoreError};
use crate::domain::entities::StudentProfile;

const PROFILE_FILE: &str = "profile.json";
const SUMMARY_FILE: &str = "memory_summary.txt";

/// Stores each student's profile and conversation summary under
/// `<root>/<student_id>/`. Student ids are restricted to a filename-safe
/// alphabet so an id can never escape the root directory.
pub struct LocalStudentDataStore {
    root: PathBuf,
}

impl LocalStudentDataStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn student_dir(&self, student_id: &str) -> Result<PathBuf, ProfileStoreError> {
        validate_student_id(student_id)?;
        Ok(self.root.join(student_id))
    }

    async fn ensure_dir(&self, dir: &Path) -> Result<(), ProfileStoreError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ProfileStoreError::IoError(e.to_string()))
    }
}

pub fn validate_student_id(student_id: &str) -> Result<(), ProfileStoreError> {
    if student_id.is_empty() || student_id.len() > 64 {
        return Err(ProfileStoreError::InvalidStudentId(
            "Student id must be 1-64 characters".to_string(),
        ));
    }

    let valid = student_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if !valid {
        return Err(ProfileStoreError::InvalidStudentId(format!(
            "Student id contains invalid characters: {}",
            student_id
        )));
    }

    Ok(())
}

#[async_trait]
impl ProfileStore for LocalStudentDataStore {
    async fn load_profile(&self, student_id: &str) -> Result<StudentProfile, ProfileStoreError> {
        let path = self.student_dir(student_id)?.join(PROFILE_FILE);

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| ProfileStoreError::SerializationError(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StudentProfile::default()),
            Err(e) => Err(ProfileStoreError::IoError(e.to_string())),
        }
    }

    async fn save_profile(
        &self,
        student_id: &str,
        profile: &StudentProfile,
    ) -> Result<(), ProfileStoreError> {
        let dir = self.student_dir(student_id)?;
        self.ensure_dir(&dir).await?;

        let serialized = serde_json::to_string_pretty(profile)
            .map_err(|e| ProfileStoreError::SerializationError(e.to_string()))?;

        tokio::fs::write(dir.join(PROFILE_FILE), serialized)
            .await
            .map_err(|e| ProfileStoreError::IoError(e.to_string()))
    }

    async fn load_summary(&self, student_id: &str) -> Result<String, ProfileStoreError> {
        let path = self.student_dir(student_id)?.join(SUMMARY_FILE);

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(ProfileStoreError::IoError(e.to_string())),
        }
    }

    async fn save_summary(
        &self,
        student_id: &str,
        summary: &str,
    ) -> Result<(), ProfileStoreError> {
        let dir = self.student_dir(student_id)?;
        self.ensure_dir(&dir).await?;

        tokio::fs::write(dir.join(SUMMARY_FILE), summary)
            .await
            .map_err(|e| ProfileStoreError::IoError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_store() -> (LocalStudentDataStore, PathBuf) {
        let root = std::env::temp_dir().join(format!("tutor-rag-test-{}", Uuid::new_v4()));
        (LocalStudentDataStore::new(&root), root)
    }

    #[test]
    fn test_student_id_validation() {
        assert!(validate_student_id("etu-2024_042").is_ok());
        assert!(validate_student_id("").is_err());
        assert!(validate_student_id("../escape").is_err());
        assert!(validate_student_id("a/b").is_err());
        assert!(validate_student_id(&"x".repeat(65)).is_err());
    }

    #[tokio::test]
    async fn test_missing_profile_yields_default() {
        let (store, root) = temp_store();

        let profile = store.load_profile("nouveau").await.unwrap();
        assert!(profile.is_empty());

        let summary = store.load_summary("nouveau").await.unwrap();
        assert!(summary.is_empty());

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_profile_round_trip() {
        let (store, root) = temp_store();

        let mut profile = StudentProfile::default();
        profile.niveau = Some("débutant".to_string());
        profile.objectifs.push("comprendre les embeddings".to_string());

        store.save_profile("etu1", &profile).await.unwrap();
        let loaded = store.load_profile("etu1").await.unwrap();

        assert_eq!(loaded.niveau.as_deref(), Some("débutant"));
        assert_eq!(loaded.objectifs.len(), 1);

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_summary_round_trip() {
        let (store, root) = temp_store();

        store
            .save_summary("etu2", "L'étudiant travaille sur le TP2.")
            .await
            .unwrap();
        let loaded = store.load_summary("etu2").await.unwrap();

        assert_eq!(loaded, "L'étudiant travaille sur le TP2.");

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn test_invalid_id_rejected_on_save() {
        let (store, root) = temp_store();

        let result = store.save_summary("../../etc", "x").await;
        assert!(matches!(
            result,
            Err(ProfileStoreError::InvalidStudentId(_))
        ));

        let _ = std::fs::remove_dir_all(root);
    }
}
