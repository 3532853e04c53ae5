use serde::Serialize;
use ts_rs::TS;

use super::entities::Submission;
use crate::models::assignments::entities::AssignmentStats;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionListResponse {
    pub assignment_id: i64,
    pub items: Vec<Submission>,
}

/// 批改结果，附带重新计算后的作业统计
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct GradeSubmissionResponse {
    pub submission: Submission,
    pub stats: AssignmentStats,
}
