pub mod create;
pub mod delete;
pub mod list;
pub mod scores;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    exams::{
        entities::Exam,
        requests::{CreateExamRequest, RecordExamScoreRequest},
    },
    users::entities::User,
};
use crate::storage::Storage;

use super::access::{ClassAccess, resolve_class_access};
use super::{storage_error_response, storage_from_request};

pub struct ExamService {
    storage: Option<Arc<dyn Storage>>,
}

impl ExamService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub async fn create_exam(
        &self,
        request: &HttpRequest,
        class_id: i64,
        exam_data: CreateExamRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_exam(self, request, class_id, exam_data).await
    }

    pub async fn list_exams(&self, request: &HttpRequest, class_id: i64) -> ActixResult<HttpResponse> {
        list::list_exams(self, request, class_id).await
    }

    pub async fn record_score(
        &self,
        request: &HttpRequest,
        exam_id: i64,
        score_data: RecordExamScoreRequest,
    ) -> ActixResult<HttpResponse> {
        scores::record_score(self, request, exam_id, score_data).await
    }

    pub async fn list_scores(&self, request: &HttpRequest, exam_id: i64) -> ActixResult<HttpResponse> {
        scores::list_scores(self, request, exam_id).await
    }

    pub async fn delete_exam(&self, request: &HttpRequest, exam_id: i64) -> ActixResult<HttpResponse> {
        delete::delete_exam(self, request, exam_id).await
    }
}

/// 读取考试并确认当前用户可以管理其所在班级
pub(crate) async fn load_managed_exam(
    storage: &Arc<dyn Storage>,
    user: &User,
    exam_id: i64,
) -> Result<Exam, HttpResponse> {
    let exam = match storage.get_exam_by_id(exam_id).await {
        Ok(Some(exam)) => exam,
        Ok(None) => {
            return Err(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::ExamNotFound, "Exam not found")));
        }
        Err(e) => return Err(storage_error_response("Failed to load exam", &e)),
    };

    let (_, access) = resolve_class_access(storage, user, exam.class_id).await?;
    require_manage(access)?;
    Ok(exam)
}

pub(crate) fn require_manage(access: ClassAccess) -> Result<(), HttpResponse> {
    if access.can_manage() {
        Ok(())
    } else {
        Err(super::access::forbidden(
            "Only the class teacher can manage exams",
        ))
    }
}
