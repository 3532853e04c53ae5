//! 班级成绩册读取

use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::exam_scores::{Column as ExamScoreColumn, Entity as ExamScores};
use crate::entity::exams::{Column as ExamColumn, Entity as Exams};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{LmsError, Result};
use crate::grading::{GradeItem, Gradebook, ScoreRecord};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 读取班级的考试、考试成绩、作业与已批改提交
    pub async fn load_class_gradebook_impl(&self, class_id: i64) -> Result<Gradebook> {
        let exams = Exams::find()
            .filter(ExamColumn::ClassId.eq(class_id))
            .order_by_asc(ExamColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试列表失败: {e}")))?;

        let assignments = Assignments::find()
            .filter(AssignmentColumn::ClassId.eq(class_id))
            .order_by_asc(AssignmentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业列表失败: {e}")))?;

        let exam_ids: Vec<i64> = exams.iter().map(|e| e.id).collect();
        let assignment_ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();

        let exam_scores = if exam_ids.is_empty() {
            Vec::new()
        } else {
            ExamScores::find()
                .filter(ExamScoreColumn::ExamId.is_in(exam_ids))
                .order_by_asc(ExamScoreColumn::Id)
                .all(&self.db)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询考试成绩失败: {e}")))?
        };

        let graded_submissions = if assignment_ids.is_empty() {
            Vec::new()
        } else {
            Submissions::find()
                .filter(SubmissionColumn::AssignmentId.is_in(assignment_ids))
                .filter(SubmissionColumn::Score.is_not_null())
                .order_by_asc(SubmissionColumn::Id)
                .all(&self.db)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询已批改提交失败: {e}")))?
        };

        Ok(Gradebook {
            exams: exams
                .iter()
                .map(|e| GradeItem {
                    id: e.id,
                    max_score: e.max_score,
                })
                .collect(),
            exam_scores: exam_scores
                .iter()
                .map(|s| ScoreRecord {
                    item_id: s.exam_id,
                    student_id: s.student_id,
                    score: s.score,
                })
                .collect(),
            assignments: assignments
                .iter()
                .map(|a| GradeItem {
                    id: a.id,
                    max_score: a.max_score,
                })
                .collect(),
            assignment_scores: graded_submissions
                .iter()
                .filter_map(|s| {
                    s.score.map(|score| ScoreRecord {
                        item_id: s.assignment_id,
                        student_id: s.student_id,
                        score,
                    })
                })
                .collect(),
        })
    }
}
