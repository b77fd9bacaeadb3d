use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::entities::StudentProfile;

#[derive(Debug, Serialize)]
pub struct ProfileDto {
    pub student_id: String,
    pub niveau: Option<String>,
    pub objectifs: Vec<String>,
    pub preferences: Vec<String>,
    pub difficultes: Vec<String>,
    pub faits: BTreeMap<String, String>,
}

impl ProfileDto {
    pub fn from_profile(student_id: String, profile: StudentProfile) -> Self {
        Self {
            student_id,
            niveau: profile.niveau,
            objectifs: profile.objectifs,
            preferences: profile.preferences,
            difficultes: profile.difficultes,
            faits: profile.faits,
        }
    }
}
