use serde::Serialize;
use ts_rs::TS;

use super::entities::{Exam, ExamScore};

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamListResponse {
    pub items: Vec<Exam>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/exam.ts")]
pub struct ExamScoreListResponse {
    pub exam: Exam,
    pub items: Vec<ExamScore>,
}
