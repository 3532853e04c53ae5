use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, Utc};
use tracing::info;

use super::SubmissionService;
use crate::errors::LmsError;
use crate::models::{
    ApiResponse, ErrorCode, assignments::entities::Assignment,
    submissions::requests::CreateSubmissionRequest,
};
use crate::services::{
    access::forbidden, assignments::load_assignment_access, current_user, or_respond,
    storage_error_response,
};

/// 截止时间之后提交记为迟交；没有截止时间的作业永不迟交
pub(crate) fn is_late_submission(assignment: &Assignment, submitted_at: DateTime<Utc>) -> bool {
    assignment.due_date.is_some_and(|due| submitted_at > due)
}

pub async fn submit(
    service: &SubmissionService,
    request: &HttpRequest,
    assignment_id: i64,
    submission_data: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (assignment, access) =
        or_respond!(load_assignment_access(&storage, &user, assignment_id).await);
    if !access.is_learner() {
        return Ok(forbidden("Only students of the class can submit"));
    }

    if submission_data.content.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Submission content must not be empty",
        )));
    }

    let is_late = is_late_submission(&assignment, Utc::now());

    match storage
        .upsert_submission(assignment.id, user.id, submission_data.content, is_late)
        .await
    {
        Ok(submission) => {
            info!(
                "User {} submitted assignment {} (late: {})",
                user.id, assignment.id, is_late
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "Submission saved")))
        }
        Err(LmsError::Conflict(_)) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::SubmissionAlreadyGraded,
            "Submission has already been graded and cannot be changed",
        ))),
        Err(e) => Ok(storage_error_response("Failed to save submission", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn assignment(due_date: Option<DateTime<Utc>>) -> Assignment {
        let now = Utc::now();
        Assignment {
            id: 7,
            class_id: 1,
            title: "작문".to_string(),
            description: None,
            max_score: 10.0,
            due_date,
            created_by: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_late_submission() {
        let due = Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).unwrap();
        let with_due = assignment(Some(due));

        assert!(!is_late_submission(&with_due, due - Duration::minutes(1)));
        assert!(!is_late_submission(&with_due, due));
        assert!(is_late_submission(&with_due, due + Duration::seconds(1)));

        let open = assignment(None);
        assert!(!is_late_submission(&open, due + Duration::days(365)));
    }
}
