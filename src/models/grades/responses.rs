use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::grading::{GradeSummary, GradeTier};

/// 单个学生的成绩汇总
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct StudentGradeSummary {
    pub student_id: i64,
    pub display_name: String,
    #[serde(flatten)]
    #[ts(flatten)]
    pub grades: GradeSummary,
}

/// 班级成绩列表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ClassGradeListResponse {
    pub class_id: i64,
    pub items: Vec<StudentGradeSummary>,
}

/// 期末成绩计算使用的权重
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeWeightsInfo {
    pub test_weight: f64,
    pub assignment_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct TierCount {
    pub tier: GradeTier,
    pub label: String,
    pub count: usize,
}

/// 班级成绩统计，会被缓存
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct ClassGradeStatsResponse {
    pub class_id: i64,
    pub weights: GradeWeightsInfo,
    pub class_average: Option<f64>,
    pub graded_students: usize,
    pub total_students: usize,
    pub tier_counts: Vec<TierCount>,
}
