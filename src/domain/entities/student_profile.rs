use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable facts about a student, extracted from their messages over time and
/// persisted as `profile.json` under the student's data directory. Field
/// names match the on-disk JSON produced by the course assistant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub niveau: Option<String>,
    #[serde(default)]
    pub objectifs: Vec<String>,
    #[serde(default)]
    pub preferences: Vec<String>,
    #[serde(default)]
    pub difficultes: Vec<String>,
    #[serde(default)]
    pub faits: BTreeMap<String, String>,
}

impl StudentProfile {
    /// Folds newly extracted facts into the profile. Lists are appended
    /// without duplicates, a non-null level replaces the old one, and map
    /// entries overwrite by key.
    pub fn merge(&mut self, update: StudentProfile) {
        if update.niveau.is_some() {
            self.niveau = update.niveau;
        }
        merge_list(&mut self.objectifs, update.objectifs);
        merge_list(&mut self.preferences, update.preferences);
        merge_list(&mut self.difficultes, update.difficultes);
        self.faits.extend(update.faits);
    }

    pub fn is_empty(&self) -> bool {
        self.niveau.is_none()
            && self.objectifs.is_empty()
            && self.preferences.is_empty()
            && self.difficultes.is_empty()
            && self.faits.is_empty()
    }
}

fn merge_list(existing: &mut Vec<String>, incoming: Vec<String>) {
    for item in incoming {
        let trimmed = item.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !existing.iter().any(|e| e.eq_ignore_ascii_case(trimmed)) {
            existing.push(trimmed.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(StudentProfile::default().is_empty());
    }

    #[test]
    fn test_merge_deduplicates_lists() {
        let mut profile = StudentProfile {
            objectifs: vec!["réussir l'examen".to_string()],
            ..Default::default()
        };

        profile.merge(StudentProfile {
            niveau: Some("master 1".to_string()),
            objectifs: vec![
                "Réussir l'examen".to_string(),
                "comprendre les embeddings".to_string(),
            ],
            faits: BTreeMap::from([("langue".to_string(), "français".to_string())]),
            ..Default::default()
        });

        assert_eq!(profile.niveau.as_deref(), Some("master 1"));
        assert_eq!(profile.objectifs.len(), 2);
        assert_eq!(profile.faits.get("langue").map(String::as_str), Some("français"));
    }

    #[test]
    fn test_merge_keeps_level_when_update_is_null() {
        let mut profile = StudentProfile {
            niveau: Some("licence 3".to_string()),
            ..Default::default()
        };
        profile.merge(StudentProfile::default());
        assert_eq!(profile.niveau.as_deref(), Some("licence 3"));
    }

    #[test]
    fn test_json_round_trip() {
        let profile = StudentProfile {
            niveau: Some("master 1".to_string()),
            objectifs: vec!["projet final".to_string()],
            preferences: vec!["exemples concrets".to_string()],
            difficultes: vec!["attention".to_string()],
            faits: BTreeMap::from([("groupe".to_string(), "B".to_string())]),
        };

        let json = serde_json::to_string(&profile).unwrap();
        let back: StudentProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, back);
    }

    #[test]
    fn test_deserializes_partial_json() {
        // Extraction output may omit fields entirely.
        let back: StudentProfile = serde_json::from_str(r#"{"niveau": "master 2"}"#).unwrap();
        assert_eq!(back.niveau.as_deref(), Some("master 2"));
        assert!(back.objectifs.is_empty());
    }
}
