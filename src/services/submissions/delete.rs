use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubmissionService, load_submission_access};
use crate::models::{ApiResponse, ErrorCode, users::entities::UserRole};
use crate::services::{
    access::forbidden, current_user, invalidate_grade_cache, or_respond, storage_error_response,
};

/// 删除提交：本人或管理员，且仅限未批改
pub async fn delete_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (submission, assignment, _) =
        or_respond!(load_submission_access(&storage, &user, submission_id).await);
    if submission.student_id != user.id && user.role != UserRole::Admin {
        return Ok(forbidden("You cannot delete this submission"));
    }

    let already_graded = || {
        HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::SubmissionAlreadyGraded,
            "Graded submissions cannot be deleted",
        ))
    };

    if submission.is_graded() {
        return Ok(already_graded());
    }

    match storage.delete_ungraded_submission(submission.id).await {
        Ok(true) => {
            invalidate_grade_cache(request, assignment.class_id).await;
            info!("Submission {} deleted by user {}", submission.id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Submission deleted")))
        }
        // 读取之后被批改
        Ok(false) => Ok(already_graded()),
        Err(e) => Ok(storage_error_response("Failed to delete submission", &e)),
    }
}
