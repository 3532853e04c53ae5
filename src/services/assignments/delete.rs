use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, load_assignment_access, require_manage};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    current_user, invalidate_grade_cache, or_respond, storage_error_response,
};

pub async fn delete_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (assignment, access) =
        or_respond!(load_assignment_access(&storage, &user, assignment_id).await);
    or_respond!(require_manage(access));

    match storage.delete_assignment(assignment.id).await {
        Ok(true) => {
            invalidate_grade_cache(request, assignment.class_id).await;
            info!("Assignment {} deleted by user {}", assignment.id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Assignment deleted")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Ok(storage_error_response("Failed to delete assignment", &e)),
    }
}
