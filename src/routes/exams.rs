use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::exams::requests::{CreateExamRequest, RecordExamScoreRequest};
use crate::models::users::entities::UserRole;
use crate::services::ExamService;
use crate::utils::{SafeClassIdI64, SafeExamIdI64};

static EXAM_SERVICE: Lazy<ExamService> = Lazy::new(ExamService::new_lazy);

pub async fn create_exam(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    exam_data: web::Json<CreateExamRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .create_exam(&req, class_id.0, exam_data.into_inner())
        .await
}

pub async fn list_exams(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_exams(&req, class_id.0).await
}

pub async fn record_score(
    req: HttpRequest,
    exam_id: SafeExamIdI64,
    score_data: web::Json<RecordExamScoreRequest>,
) -> ActixResult<HttpResponse> {
    EXAM_SERVICE
        .record_score(&req, exam_id.0, score_data.into_inner())
        .await
}

pub async fn list_scores(req: HttpRequest, exam_id: SafeExamIdI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.list_scores(&req, exam_id.0).await
}

pub async fn delete_exam(req: HttpRequest, exam_id: SafeExamIdI64) -> ActixResult<HttpResponse> {
    EXAM_SERVICE.delete_exam(&req, exam_id.0).await
}

/// `/api/v1/classes/{class_id}/exams`，由班级 scope 挂载
pub fn configure_class_exam_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{class_id}/exams")
            .route(web::get().to(list_exams))
            .route(
                web::post()
                    .to(create_exam)
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
            ),
    );
}

pub fn configure_exam_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/exams")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    // 成绩录入与考试管理仅限教师与管理员，具体班级权限在服务层判断
                    .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles()))
                    .route("/{exam_id}", web::delete().to(delete_exam))
                    .route("/{exam_id}/scores", web::get().to(list_scores))
                    .route("/{exam_id}/scores", web::put().to(record_score)),
            ),
    );
}
