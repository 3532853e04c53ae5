use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::{
    ApiResponse, ErrorCode,
    classes::requests::CreateClassRequest,
    users::entities::UserRole,
};
use crate::services::{current_user, or_respond, storage_error_response};
use crate::utils::validate::validate_title;

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    mut class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let user = or_respond!(current_user(request));
    let storage = service.get_storage(request)?;

    class_data.name = match validate_title(&class_data.name) {
        Ok(name) => name,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ClassCreationFailed, msg)));
        }
    };

    match user.role {
        // 教师只能为自己创建班级
        UserRole::Teacher => {
            if class_data.teacher_id.is_some_and(|id| id != user.id) {
                return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                    ErrorCode::ClassPermissionDenied,
                    "Teachers can only create classes for themselves",
                )));
            }
            class_data.teacher_id = Some(user.id);
        }
        // 管理员必须指定教师
        UserRole::Admin => {
            let Some(teacher_id) = class_data.teacher_id else {
                return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                    ErrorCode::ClassCreationFailed,
                    "teacher_id is required when an admin creates a class",
                )));
            };
            match storage.get_user_by_id(teacher_id).await {
                Ok(Some(teacher)) if teacher.role == UserRole::Teacher => {}
                Ok(Some(_)) => {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::ClassCreationFailed,
                        "The specified user is not a teacher",
                    )));
                }
                Ok(None) => {
                    return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                        ErrorCode::UserNotFound,
                        "Teacher not found",
                    )));
                }
                Err(e) => return Ok(storage_error_response("Failed to load teacher", &e)),
            }
        }
        UserRole::User => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::ClassPermissionDenied,
                "Only teachers and admins can create classes",
            )));
        }
    }

    match storage.create_class(class_data).await {
        Ok(class) => {
            info!("Class {} created by user {}", class.id, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created")))
        }
        Err(e) => Ok(storage_error_response("Class creation failed", &e)),
    }
}
