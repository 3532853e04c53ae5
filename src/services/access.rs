//! 班级内权限
//!
//! 全局管理员对所有班级有完整权限；其他用户的权限由其在班级中的角色决定。

use actix_web::HttpResponse;
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    class_users::entities::ClassUserRole,
    classes::entities::Class,
    users::entities::{User, UserRole},
};
use crate::storage::Storage;

use super::storage_error_response;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassAccess {
    Admin,
    Teacher,
    Representative,
    Student,
}

impl ClassAccess {
    pub fn from_member_role(role: &ClassUserRole) -> Self {
        match role {
            ClassUserRole::Teacher => ClassAccess::Teacher,
            ClassUserRole::ClassRepresentative => ClassAccess::Representative,
            ClassUserRole::Student => ClassAccess::Student,
        }
    }

    /// 管理考试、作业，录入和批改成绩
    pub fn can_manage(&self) -> bool {
        matches!(self, ClassAccess::Admin | ClassAccess::Teacher)
    }

    /// 查看全班成绩与统计
    pub fn can_view_grades(&self) -> bool {
        matches!(
            self,
            ClassAccess::Admin | ClassAccess::Teacher | ClassAccess::Representative
        )
    }

    /// 作为学生提交作业、查看自己的成绩
    pub fn is_learner(&self) -> bool {
        matches!(self, ClassAccess::Representative | ClassAccess::Student)
    }
}

/// 查询班级以及当前用户在其中的权限
///
/// 班级不存在返回 404，非成员返回 403。
pub async fn resolve_class_access(
    storage: &Arc<dyn Storage>,
    user: &User,
    class_id: i64,
) -> Result<(Class, ClassAccess), HttpResponse> {
    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Err(storage_error_response("Failed to load class", &e)),
    };

    if user.role == UserRole::Admin {
        return Ok((class, ClassAccess::Admin));
    }

    match storage.get_class_user(class_id, user.id).await {
        Ok(Some(member)) => Ok((class, ClassAccess::from_member_role(&member.role))),
        Ok(None) => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "You are not a member of this class",
        ))),
        Err(e) => Err(storage_error_response("Failed to load class membership", &e)),
    }
}

pub fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::ClassPermissionDenied,
        message,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_capabilities() {
        assert!(ClassAccess::Admin.can_manage());
        assert!(ClassAccess::Teacher.can_manage());
        assert!(!ClassAccess::Representative.can_manage());

        assert!(ClassAccess::Representative.can_view_grades());
        assert!(!ClassAccess::Student.can_view_grades());

        assert!(ClassAccess::Student.is_learner());
        assert!(ClassAccess::Representative.is_learner());
        assert!(!ClassAccess::Teacher.is_learner());
        assert!(!ClassAccess::Admin.is_learner());
    }

    #[test]
    fn test_from_member_role() {
        assert_eq!(
            ClassAccess::from_member_role(&ClassUserRole::ClassRepresentative),
            ClassAccess::Representative
        );
        assert_eq!(
            ClassAccess::from_member_role(&ClassUserRole::Teacher),
            ClassAccess::Teacher
        );
    }
}
