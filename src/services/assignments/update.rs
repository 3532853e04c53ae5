use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssignmentService, load_assignment_access, require_manage};
use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{entities::Assignment, requests::UpdateAssignmentRequest},
};
use crate::services::{
    current_user, invalidate_grade_cache, or_respond, storage_error_response,
};
use crate::utils::validate::{validate_max_score, validate_title};

fn changes_due_date(assignment: &Assignment, update: &UpdateAssignmentRequest) -> bool {
    update
        .due_date
        .is_some_and(|due| Some(due.timestamp()) != assignment.due_date.map(|d| d.timestamp()))
}

fn changes_max_score(assignment: &Assignment, update: &UpdateAssignmentRequest) -> bool {
    update
        .max_score
        .is_some_and(|max| max != assignment.max_score)
}

pub async fn update_assignment(
    service: &AssignmentService,
    request: &HttpRequest,
    assignment_id: i64,
    mut update_data: UpdateAssignmentRequest,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (assignment, access) =
        or_respond!(load_assignment_access(&storage, &user, assignment_id).await);
    or_respond!(require_manage(access));

    if let Some(title) = update_data.title.take() {
        match validate_title(&title) {
            Ok(title) => update_data.title = Some(title),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
            }
        }
    }

    if let Some(max_score) = update_data.max_score
        && let Err(msg) = validate_max_score(max_score)
    {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::AssignmentInvalid, msg)));
    }

    let due_date_changed = changes_due_date(&assignment, &update_data);
    let max_score_changed = changes_max_score(&assignment, &update_data);

    // 存储层会在事务内再次检查，这里先返回具体的错误码
    if due_date_changed || max_score_changed {
        let stats = match storage.get_assignment_stats(assignment.id).await {
            Ok(stats) => stats,
            Err(e) => return Ok(storage_error_response("Failed to load assignment stats", &e)),
        };
        if due_date_changed && stats.submitted_count > 0 {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AssignmentDueDateLocked,
                "Due date cannot be changed after submissions exist",
            )));
        }
        if max_score_changed && stats.graded_count > 0 {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AssignmentMaxScoreLocked,
                "Max score cannot be changed after submissions are graded",
            )));
        }
    }

    match storage.update_assignment(assignment.id, update_data).await {
        Ok(Some(updated)) => {
            invalidate_grade_cache(request, updated.class_id).await;
            info!("Assignment {} updated by user {}", updated.id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Assignment updated")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::AssignmentNotFound,
            "Assignment not found",
        ))),
        Err(e) => Ok(storage_error_response("Failed to update assignment", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn assignment() -> Assignment {
        let now = Utc::now();
        Assignment {
            id: 1,
            class_id: 1,
            title: "받아쓰기".to_string(),
            description: None,
            max_score: 20.0,
            due_date: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single(),
            created_by: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_change_detection() {
        let current = assignment();

        let same = UpdateAssignmentRequest {
            max_score: Some(20.0),
            due_date: current.due_date,
            ..Default::default()
        };
        assert!(!changes_due_date(&current, &same));
        assert!(!changes_max_score(&current, &same));

        let moved = UpdateAssignmentRequest {
            due_date: Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).single(),
            max_score: Some(25.0),
            ..Default::default()
        };
        assert!(changes_due_date(&current, &moved));
        assert!(changes_max_score(&current, &moved));

        let untouched = UpdateAssignmentRequest {
            title: Some("새 제목".to_string()),
            ..Default::default()
        };
        assert!(!changes_due_date(&current, &untouched));
        assert!(!changes_max_score(&current, &untouched));
    }
}
