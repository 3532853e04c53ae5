use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, load_assignment_access};
use crate::models::{ApiResponse, assignments::responses::AssignmentDetailResponse};
use crate::services::{current_user, or_respond, storage_error_response};

pub async fn get_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (assignment, _) = or_respond!(load_assignment_access(&storage, &user, assignment_id).await);

    match storage.get_assignment_stats(assignment.id).await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssignmentDetailResponse { assignment, stats },
            "Assignment retrieved",
        ))),
        Err(e) => Ok(storage_error_response("Failed to load assignment stats", &e)),
    }
}
