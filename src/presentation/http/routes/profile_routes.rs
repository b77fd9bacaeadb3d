use axum::{Router, routing::get};
use std::sync::Arc;

use crate::presentation::http::handlers::ProfileHandler;

pub fn profile_routes(profile_handler: Arc<ProfileHandler>) -> Router {
    Router::new()
        .route(
            "/students/{student_id}/profile",
            get(ProfileHandler::get_profile),
        )
        .with_state(profile_handler)
}
