use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, require_manage};
use crate::models::{ApiResponse, ErrorCode, assignments::requests::CreateAssignmentRequest};
use crate::services::{
    access::resolve_class_access, current_user, or_respond, storage_error_response,
};
use crate::utils::validate::{validate_max_score, validate_title};

pub async fn create_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    class_id: i64,
    mut assignment_data: CreateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (_, access) = or_respond!(resolve_class_access(&storage, &user, class_id).await);
    or_respond!(require_manage(access));

    assignment_data.title = match validate_title(&assignment_data.title) {
        Ok(title) => title,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
        }
    };

    if let Some(max_score) = assignment_data.max_score
        && let Err(msg) = validate_max_score(max_score)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
    }

    match storage
        .create_assignment(class_id, user.id, assignment_data)
        .await
    {
        Ok(assignment) => {
            info!("Assignment {} created in class {}", assignment.id, class_id);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(assignment, "Assignment created")))
        }
        Err(e) => Ok(storage_error_response("Assignment creation failed", &e)),
    }
}
