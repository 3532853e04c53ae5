use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

/// 创建考试请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct CreateExamRequest {
    pub title: String,
    pub max_score: f64,
    pub exam_date: Option<DateTime<Utc>>, // ISO 8601 格式
}

/// 录入考试成绩请求，重复录入会覆盖原成绩
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct RecordExamScoreRequest {
    pub student_id: i64,
    pub score: f64,
    pub notes: Option<String>,
}
