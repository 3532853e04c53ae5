use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, summary::load_class_summaries};
use crate::models::{ApiResponse, grades::responses::ClassGradeListResponse};
use crate::services::{
    access::{forbidden, resolve_class_access},
    current_user, or_respond,
};

pub async fn list_class_grades(
    service: &GradeService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (_, access) = or_respond!(resolve_class_access(&storage, &user, class_id).await);
    if !access.can_view_grades() {
        return Ok(forbidden("You cannot view the grades of this class"));
    }

    let weights = or_respond!(service.get_weights());
    let items = or_respond!(load_class_summaries(&storage, class_id, &weights).await);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassGradeListResponse { class_id, items },
        "Class grades retrieved",
    )))
}
