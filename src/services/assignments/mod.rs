pub mod create;
pub mod delete;
pub mod detail;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    assignments::{
        entities::Assignment,
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    users::entities::User,
};
use crate::storage::Storage;

use super::access::{ClassAccess, resolve_class_access};
use super::{storage_error_response, storage_from_request};

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from_request(request),
        }
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        class_id: i64,
        assignment_data: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, request, class_id, assignment_data).await
    }

    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, request, class_id).await
    }

    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        detail::get_assignment(self, request, assignment_id).await
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        update_data: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, request, assignment_id, update_data).await
    }

    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, request, assignment_id).await
    }
}

/// 读取作业以及当前用户在其班级中的权限
pub(crate) async fn load_assignment_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    assignment_id: i64,
) -> Result<(Assignment, ClassAccess), HttpResponse> {
    let assignment = match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => assignment,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::AssignmentNotFound,
                "Assignment not found",
            )));
        }
        Err(e) => return Err(storage_error_response("Failed to load assignment", &e)),
    };

    let (_, access) = resolve_class_access(storage, user, assignment.class_id).await?;
    Ok((assignment, access))
}

pub(crate) fn require_manage(access: ClassAccess) -> Result<(), HttpResponse> {
    if access.can_manage() {
        Ok(())
    } else {
        Err(super::access::forbidden(
            "Only the class teacher can manage assignments",
        ))
    }
}
