use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::GradeService;
use crate::utils::SafeClassIdI64;

static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn list_class_grades(
    req: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.list_class_grades(&req, class_id.0).await
}

pub async fn get_my_grades(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.get_my_grades(&req, class_id.0).await
}

pub async fn get_class_stats(
    req: HttpRequest,
    class_id: SafeClassIdI64,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.get_class_stats(&req, class_id.0).await
}

/// `/api/v1/classes/{class_id}/grades`，由班级 scope 挂载
///
/// 课代表的全局角色是普通用户，因此这里不做全局角色限制，班级权限在服务层判断。
pub fn configure_class_grade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/{class_id}/grades").route(web::get().to(list_class_grades)))
        .service(web::resource("/{class_id}/grades/my").route(web::get().to(get_my_grades)))
        .service(
            web::resource("/{class_id}/grades/stats").route(web::get().to(get_class_stats)),
        );
}
