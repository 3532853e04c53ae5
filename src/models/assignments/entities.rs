use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    // 唯一 ID
    pub id: i64,
    // 关联的班级 ID
    pub class_id: i64,
    // 作业标题
    pub title: String,
    // 作业说明
    pub description: Option<String>,
    // 作业满分
    pub max_score: f64,
    // 截止时间，已有提交后不可修改
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    // 创建者 ID
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 作业的汇总统计，与提交写入在同一事务中维护
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentStats {
    pub assignment_id: i64,
    pub submitted_count: i64,
    pub graded_count: i64,
    pub late_count: i64,
    /// 已批改提交的平均分（10 分制），尚无批改时为空
    pub average_score: Option<f64>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl AssignmentStats {
    pub fn empty(assignment_id: i64) -> Self {
        Self {
            assignment_id,
            submitted_count: 0,
            graded_count: 0,
            late_count: 0,
            average_score: None,
            updated_at: chrono::Utc::now(),
        }
    }
}
