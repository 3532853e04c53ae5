use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::{ApiResponse, assignments::responses::AssignmentListResponse};
use crate::services::{
    access::resolve_class_access, current_user, or_respond, storage_error_response,
};

pub async fn list_assignments(
    service: &AssignmentService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    or_respond!(resolve_class_access(&storage, &user, class_id).await);

    match storage.list_class_assignments(class_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AssignmentListResponse { items },
            "Assignment list retrieved",
        ))),
        Err(e) => Ok(storage_error_response("Failed to list assignments", &e)),
    }
}
