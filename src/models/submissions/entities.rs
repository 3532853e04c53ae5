use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 学生的作业提交，每个 (作业, 学生) 至多一条
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: String,
    pub is_late: bool,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    // 批改信息，未批改时为空
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub graded_at: Option<chrono::DateTime<chrono::Utc>>,
    pub graded_by: Option<i64>,
}

impl Submission {
    pub fn is_graded(&self) -> bool {
        self.score.is_some()
    }
}
