use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use crate::application::use_cases::get_student_profile::{
    GetStudentProfileError, GetStudentProfileUseCase,
};
use crate::presentation::http::dto::{ApiResponse, ProfileDto};

pub struct ProfileHandler {
    get_profile_use_case: Arc<GetStudentProfileUseCase>,
}

impl ProfileHandler {
    pub fn new(get_profile_use_case: Arc<GetStudentProfileUseCase>) -> Self {
        Self {
            get_profile_use_case,
        }
    }

    pub async fn get_profile(
        State(handler): State<Arc<ProfileHandler>>,
        Path(student_id): Path<String>,
    ) -> impl IntoResponse {
        match handler.get_profile_use_case.execute(&student_id).await {
            Ok(profile) => (
                StatusCode::OK,
                Json(ApiResponse::success(ProfileDto::from_profile(
                    student_id, profile,
                ))),
            ),
            Err(GetStudentProfileError::ValidationError(msg)) => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("INVALID_REQUEST", msg)),
            ),
            Err(e) => {
                tracing::error!("Loading profile for {} failed: {}", student_id, e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "PROFILE_FAILED",
                        "Impossible de charger le profil",
                    )),
                )
            }
        }
    }
}
