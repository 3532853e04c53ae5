//! 成绩查询
//!
//! 三个接口都从班级成绩册出发，经过 `grading` 模块计算学生成绩汇总：
//! - 班级成绩列表（教师、课代表、管理员）
//! - 我的成绩（学生）
//! - 班级统计（教师、课代表、管理员），结果缓存

pub mod class_grades;
pub mod my_grades;
pub mod stats;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::error;

use crate::config::AppConfig;
use crate::grading::GradeWeights;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

use super::storage_from_request;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    /// 配置加载时已校验过权重，这里仍然不假设一定合法
    pub(crate) fn get_weights(&self) -> Result<GradeWeights, HttpResponse> {
        AppConfig::get().grade_weights().map_err(|e| {
            error!("Invalid grading configuration: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::GradeNotAvailable,
                "Grading weights are misconfigured",
            ))
        })
    }

    pub async fn list_class_grades(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        class_grades::list_class_grades(self, request, class_id).await
    }

    pub async fn get_my_grades(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        my_grades::get_my_grades(self, request, class_id).await
    }

    pub async fn get_class_stats(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        stats::get_class_stats(self, request, class_id).await
    }
}
