pub mod access;
pub mod assignments;
pub mod auth;
pub mod classes;
pub mod exams;
pub mod grades;
pub mod submissions;
pub mod users;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use exams::ExamService;
pub use grades::GradeService;
pub use submissions::SubmissionService;
pub use users::UserService;

/// 取出 `Result<T, HttpResponse>` 的值，失败时直接把响应返回给客户端
macro_rules! or_respond {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(response) => return Ok(response),
        }
    };
}

pub(crate) use or_respond;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;
use tracing::error;

use crate::cache::{ObjectCache, class_grade_stats_key};
use crate::errors::LmsError;
use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, ErrorCode, users::entities::User};
use crate::storage::Storage;

/// 从 app data 中取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Storage not found in app data"))
}

/// 从 app data 中取出缓存实例
pub(crate) fn cache_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Cache not found in app data"))
}

/// 当前登录用户；RequireJWT 未生效时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

/// 存储层错误转换为 HTTP 响应
pub(crate) fn storage_error_response(context: &str, err: &LmsError) -> HttpResponse {
    match err {
        LmsError::NotFound(msg) => HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            format!("{context}: {msg} not found"),
        )),
        LmsError::Conflict(msg) => HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::Conflict,
            format!("{context}: {msg}"),
        )),
        LmsError::Validation(msg) | LmsError::InvalidScore(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                format!("{context}: {msg}"),
            )),
        _ => {
            error!("{}: {}", context, err);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("{context}: {err}"),
            ))
        }
    }
}

/// 成绩相关数据变化后清除班级成绩统计缓存
pub(crate) async fn invalidate_grade_cache(request: &HttpRequest, class_id: i64) {
    match cache_from_request(request) {
        Ok(cache) => cache.remove(&class_grade_stats_key(class_id)).await,
        Err(_) => error!(
            "Cache unavailable, grade statistics of class {} may be stale",
            class_id
        ),
    }
}
