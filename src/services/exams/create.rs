use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ExamService, require_manage};
use crate::models::{ApiResponse, ErrorCode, exams::requests::CreateExamRequest};
use crate::services::{
    access::resolve_class_access, current_user, or_respond, storage_error_response,
};
use crate::utils::validate::{validate_max_score, validate_title};

pub async fn create_exam(
    service: &ExamService,
    request: &HttpRequest,
    class_id: i64,
    mut exam_data: CreateExamRequest,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (_, access) = or_respond!(resolve_class_access(&storage, &user, class_id).await);
    or_respond!(require_manage(access));

    exam_data.title = match validate_title(&exam_data.title) {
        Ok(title) => title,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    };

    if let Err(msg) = validate_max_score(exam_data.max_score) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ExamScoreInvalid, msg)));
    }

    match storage.create_exam(class_id, user.id, exam_data).await {
        Ok(exam) => {
            info!("Exam {} created in class {}", exam.id, class_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(exam, "Exam created")))
        }
        Err(e) => Ok(storage_error_response("Exam creation failed", &e)),
    }
}
