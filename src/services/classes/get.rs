use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{ApiResponse, classes::responses::ClassDetailResponse};
use crate::services::{
    access::resolve_class_access, current_user, or_respond, storage_error_response,
};

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    let (class, _) = or_respond!(resolve_class_access(&storage, &user, class_id).await);

    match storage.list_class_members(class_id).await {
        Ok(members) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ClassDetailResponse::new(class, &members, user.id),
            "Class information retrieved",
        ))),
        Err(e) => Ok(storage_error_response("Failed to load class members", &e)),
    }
}
