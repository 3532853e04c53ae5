use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ExamService, load_managed_exam};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{
    current_user, invalidate_grade_cache, or_respond, storage_error_response,
};

pub async fn delete_exam(
    service: &ExamService,
    request: &HttpRequest,
    exam_id: i64,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let exam = or_respond!(load_managed_exam(&storage, &user, exam_id).await);

    match storage.delete_exam(exam.id).await {
        Ok(true) => {
            invalidate_grade_cache(request, exam.class_id).await;
            info!("Exam {} deleted by user {}", exam.id, user.id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Exam deleted")))
        }
        Ok(false) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::ExamNotFound, "Exam not found"))),
        Err(e) => Ok(storage_error_response("Failed to delete exam", &e)),
    }
}
