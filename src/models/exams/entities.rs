use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct Exam {
    // 唯一 ID
    pub id: i64,
    // 关联的班级 ID
    pub class_id: i64,
    // 考试名称
    pub title: String,
    // 满分
    pub max_score: f64,
    // 考试日期
    pub exam_date: Option<chrono::DateTime<chrono::Utc>>,
    // 创建者 ID
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 学生在某次考试中的成绩，每个 (考试, 学生) 至多一条
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamScore {
    pub id: i64,
    pub exam_id: i64,
    pub student_id: i64,
    pub score: f64,
    pub notes: Option<String>,
    pub recorded_by: i64,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
