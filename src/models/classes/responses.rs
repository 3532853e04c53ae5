use super::entities::Class;
use crate::models::class_users::entities::{ClassUser, ClassUserRole};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 班级列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassListResponse {
    pub pagination: PaginationInfo,
    pub items: Vec<Class>,
}

/// 班级详情：班级本身、当前用户在班级中的角色与学生人数
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class.ts")]
pub struct ClassDetailResponse {
    pub class: Class,
    /// 管理员未加入班级时为空
    pub my_role: Option<ClassUserRole>,
    pub student_count: usize,
}

impl ClassDetailResponse {
    pub fn new(class: Class, members: &[ClassUser], viewer_id: i64) -> Self {
        let my_role = members
            .iter()
            .find(|member| member.user_id == viewer_id)
            .map(|member| member.role.clone());
        let student_count = members
            .iter()
            .filter(|member| member.role.is_learner())
            .count();

        Self {
            class,
            my_role,
            student_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(user_id: i64, role: ClassUserRole) -> ClassUser {
        let now = chrono::Utc::now();
        ClassUser {
            id: user_id,
            class_id: 1,
            user_id,
            profile_name: None,
            role,
            updated_at: now,
            joined_at: now,
        }
    }

    fn class() -> Class {
        let now = chrono::Utc::now();
        Class {
            id: 1,
            name: "고급 1반".to_string(),
            description: None,
            teacher_id: 10,
            invite_code: "HANLMS01".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_class_detail_counts_learners() {
        let members = vec![
            member(10, ClassUserRole::Teacher),
            member(11, ClassUserRole::Student),
            member(12, ClassUserRole::ClassRepresentative),
        ];

        let detail = ClassDetailResponse::new(class(), &members, 12);
        assert_eq!(detail.student_count, 2);
        assert_eq!(detail.my_role, Some(ClassUserRole::ClassRepresentative));

        let detail = ClassDetailResponse::new(class(), &members, 1);
        assert_eq!(detail.my_role, None);
    }
}
