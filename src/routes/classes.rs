use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::{assignments, exams, grades};
use crate::middlewares;
use crate::models::class_users::requests::JoinClassRequest;
use crate::models::classes::requests::{ClassQueryParams, CreateClassRequest};
use crate::models::users::entities::UserRole;
use crate::services::ClassService;
use crate::utils::SafeClassIdI64;

// 懒加载的全局 CLASS_SERVICE 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

// HTTP处理程序
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(&req, class_data.into_inner())
        .await
}

pub async fn get_class(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req, class_id.0).await
}

pub async fn join_class(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    join_data: web::Json<JoinClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .join_class(&req, class_id.0, join_data.into_inner())
        .await
}

pub async fn list_members(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_members(&req, class_id.0).await
}

// 配置路由
//
// 班级下的考试、作业、成绩接口共用同一个 scope
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                // 用户查询自己的班级列表，管理员可以查询所有班级
                web::resource("").route(web::get().to(list_classes)).route(
                    web::post()
                        .to(create_class)
                        // 教师创建自己的班级，管理员可以创建指定教师的班级
                        .wrap(middlewares::RequireRole::new_any(UserRole::teacher_roles())),
                ),
            )
            .service(web::resource("/{class_id}").route(web::get().to(get_class)))
            .service(
                web::resource("/{class_id}/join").route(
                    web::post()
                        .to(join_class)
                        // 学生使用邀请码加入班级
                        .wrap(middlewares::RequireRole::new(&UserRole::User)),
                ),
            )
            .service(web::resource("/{class_id}/members").route(web::get().to(list_members)))
            .configure(exams::configure_class_exam_routes)
            .configure(assignments::configure_class_assignment_routes)
            .configure(grades::configure_class_grade_routes),
    );
}
