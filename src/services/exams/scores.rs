use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ExamService, load_managed_exam};
use crate::grading::normalize::validate_score;
use crate::models::{
    ApiResponse, ErrorCode,
    exams::{requests::RecordExamScoreRequest, responses::ExamScoreListResponse},
};
use crate::services::{
    current_user, invalidate_grade_cache, or_respond, storage_error_response,
};

/// 录入或覆盖学生的考试成绩
pub async fn record_score(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
    score_data: RecordExamScoreRequest,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let exam = or_respond!(load_managed_exam(&storage, &user, exam_id).await);

    if let Err(e) = validate_score(score_data.score, exam.max_score) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ExamScoreInvalid, e.message())));
    }

    match storage
        .get_class_user(exam.class_id, score_data.student_id)
        .await
    {
        Ok(Some(member)) if member.role.is_learner() => {}
        Ok(_) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::ExamStudentNotInClass,
                "The student is not enrolled in this class",
            )));
        }
        Err(e) => return Ok(storage_error_response("Failed to check membership", &e)),
    }

    let student_id = score_data.student_id;
    match storage.upsert_exam_score(exam.id, user.id, score_data).await {
        Ok(score) => {
            invalidate_grade_cache(request, exam.class_id).await;
            info!(
                "Score of student {} recorded for exam {} by user {}",
                student_id, exam.id, user.id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(score, "Score recorded")))
        }
        Err(e) => Ok(storage_error_response("Failed to record score", &e)),
    }
}

pub async fn list_scores(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let exam = or_respond!(load_managed_exam(&storage, &user, exam_id).await);

    match storage.list_exam_scores(exam.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ExamScoreListResponse { exam, items },
            "Exam scores retrieved",
        ))),
        Err(e) => Ok(storage_error_response("Failed to list exam scores", &e)),
    }
}
