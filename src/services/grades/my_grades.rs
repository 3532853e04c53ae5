use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, summary::build_student_summaries};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    access::{forbidden, resolve_class_access},
    current_user, or_respond, storage_error_response,
};

pub async fn get_my_grades(
    service: &GradeService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (_, access) = or_respond!(resolve_class_access(&storage, &user, class_id).await);
    if !access.is_learner() {
        return Ok(forbidden("Only students of the class have grades"));
    }

    let member = match storage.get_class_user(class_id, user.id).await {
        Ok(Some(member)) => member,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::GradeNotAvailable,
                "You are not a student of this class",
            )));
        }
        Err(e) => return Ok(storage_error_response("Failed to load membership", &e)),
    };

    let weights = or_respond!(service.get_weights());
    let gradebook = match storage.load_class_gradebook(class_id).await {
        Ok(gradebook) => gradebook,
        Err(e) => return Ok(storage_error_response("Failed to load gradebook", &e)),
    };

    let summaries =
        build_student_summaries(std::slice::from_ref(&member), &[user], &gradebook, &weights);

    match summaries.into_iter().next() {
        Some(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            summary,
            "Grades retrieved",
        ))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::GradeNotAvailable,
            "No grades available",
        ))),
    }
}
