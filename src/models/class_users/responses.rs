use serde::Serialize;
use ts_rs::TS;

use crate::models::class_users::entities::ClassUser;

/// 班级成员列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/class-user.ts")]
pub struct ClassMemberListResponse {
    pub class_id: i64,
    pub items: Vec<ClassUser>,
}
