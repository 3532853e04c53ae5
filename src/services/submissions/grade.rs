use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubmissionService, load_submission_access};
use crate::errors::LmsError;
use crate::grading::normalize::validate_score;
use crate::models::{
    ApiResponse, ErrorCode,
    submissions::{requests::GradeSubmissionRequest, responses::GradeSubmissionResponse},
};
use crate::services::{
    access::forbidden, current_user, invalidate_grade_cache, or_respond, storage_error_response,
};

/// 批改提交；重复批改以最后一次为准
pub async fn grade_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
    grade_data: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (submission, assignment, access) =
        or_respond!(load_submission_access(&storage, &user, submission_id).await);
    if !access.can_manage() {
        return Ok(forbidden("Only the class teacher can grade submissions"));
    }

    if let Err(e) = validate_score(grade_data.score, assignment.max_score) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SubmissionScoreInvalid,
            e.message(),
        )));
    }

    let feedback = grade_data
        .feedback
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty());

    match storage
        .grade_submission(submission.id, user.id, grade_data.score, feedback)
        .await
    {
        Ok((submission, stats)) => {
            invalidate_grade_cache(request, assignment.class_id).await;
            info!(
                "Submission {} graded {} by user {}",
                submission.id, grade_data.score, user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                GradeSubmissionResponse { submission, stats },
                "Submission graded",
            )))
        }
        // 满分在校验后被修改的情况
        Err(LmsError::InvalidScore(msg)) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::SubmissionScoreInvalid, msg))),
        Err(e) => Ok(storage_error_response("Failed to grade submission", &e)),
    }
}
