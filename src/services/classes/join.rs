use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::{
    ApiResponse, ErrorCode,
    class_users::{entities::ClassUserRole, requests::JoinClassRequest},
    users::entities::UserRole,
};
use crate::services::{
    current_user, invalidate_grade_cache, or_respond, storage_error_response,
};
use crate::utils::validate::validate_invite_code;

pub async fn join_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    join_data: JoinClassRequest,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    if user.role != UserRole::User {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "Only students can join classes",
        )));
    }

    if let Err(msg) = validate_invite_code(&join_data.invite_code) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ClassInviteCodeInvalid, msg)));
    }

    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::ClassNotFound, "Class not found")));
        }
        Err(e) => return Ok(storage_error_response("Failed to load class", &e)),
    };

    if class.invite_code != join_data.invite_code {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ClassInviteCodeInvalid,
            "Invite code does not match this class",
        )));
    }

    match storage.get_class_user(class_id, user.id).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ClassAlreadyJoined,
                "You have already joined this class",
            )));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error_response("Failed to check membership", &e)),
    }

    let profile_name = join_data
        .profile_name
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty());

    match storage
        .join_class(user.id, class_id, ClassUserRole::Student, profile_name)
        .await
    {
        Ok(member) => {
            // 新成员计入班级统计的 total_students
            invalidate_grade_cache(request, class_id).await;
            info!("User {} joined class {}", user.id, class_id);
            Ok(HttpResponse::Created().json(ApiResponse::success(member, "Joined class")))
        }
        Err(e) => Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
            ErrorCode::ClassJoinFailed,
            format!("Failed to join class: {e}"),
        ))),
    }
}
