use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, load_submission_access};
use crate::models::{ApiResponse, ErrorCode, submissions::responses::SubmissionListResponse};
use crate::services::{
    access::forbidden, assignments::load_assignment_access, current_user, or_respond,
    storage_error_response,
};

pub async fn get_my_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (assignment, access) =
        or_respond!(load_assignment_access(&storage, &user, assignment_id).await);
    if !access.is_learner() {
        return Ok(forbidden("Only students of the class have submissions"));
    }

    match storage.get_student_submission(assignment.id, user.id).await {
        Ok(Some(submission)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "Submission retrieved")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubmissionNotFound,
            "You have not submitted this assignment",
        ))),
        Err(e) => Ok(storage_error_response("Failed to load submission", &e)),
    }
}

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (assignment, access) =
        or_respond!(load_assignment_access(&storage, &user, assignment_id).await);
    if !access.can_manage() {
        return Ok(forbidden("Only the class teacher can view all submissions"));
    }

    match storage.list_assignment_submissions(assignment.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubmissionListResponse {
                assignment_id: assignment.id,
                items,
            },
            "Submission list retrieved",
        ))),
        Err(e) => Ok(storage_error_response("Failed to list submissions", &e)),
    }
}

pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    submission_id: i64,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (submission, _, access) =
        or_respond!(load_submission_access(&storage, &user, submission_id).await);
    if submission.student_id != user.id && !access.can_manage() {
        return Ok(forbidden("You cannot view this submission"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "Submission retrieved")))
}
