//! 考试与考试成绩存储操作

use super::SeaOrmStorage;
use crate::entity::exam_scores::{
    ActiveModel as ExamScoreActiveModel, Column as ExamScoreColumn, Entity as ExamScores,
};
use crate::entity::exams::{ActiveModel, Column, Entity as Exams};
use crate::errors::{LmsError, Result};
use crate::models::exams::{
    entities::{Exam, ExamScore},
    requests::{CreateExamRequest, RecordExamScoreRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建考试
    pub async fn create_exam_impl(
        &self,
        class_id: i64,
        created_by: i64,
        req: CreateExamRequest,
    ) -> Result<Exam> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(class_id),
            title: Set(req.title),
            max_score: Set(req.max_score),
            exam_date: Set(req.exam_date.map(|d| d.timestamp())),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建考试失败: {e}")))?;

        Ok(result.into_exam())
    }

    /// 通过 ID 获取考试
    pub async fn get_exam_by_id_impl(&self, exam_id: i64) -> Result<Option<Exam>> {
        let result = Exams::find_by_id(exam_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试失败: {e}")))?;

        Ok(result.map(|m| m.into_exam()))
    }

    /// 列出班级的考试，按创建顺序
    pub async fn list_class_exams_impl(&self, class_id: i64) -> Result<Vec<Exam>> {
        let result = Exams::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_exam()).collect())
    }

    /// 录入考试成绩，已有记录时覆盖
    pub async fn upsert_exam_score_impl(
        &self,
        exam_id: i64,
        recorded_by: i64,
        req: RecordExamScoreRequest,
    ) -> Result<ExamScore> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = ExamScores::find()
            .filter(
                Condition::all()
                    .add(ExamScoreColumn::ExamId.eq(exam_id))
                    .add(ExamScoreColumn::StudentId.eq(req.student_id)),
            )
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试成绩失败: {e}")))?;

        let saved = match existing {
            Some(model) => {
                let mut active = model.into_active_model();
                active.score = Set(req.score);
                active.notes = Set(req.notes);
                active.recorded_by = Set(recorded_by);
                active.updated_at = Set(now);
                active.update(&txn).await
            }
            None => {
                ExamScoreActiveModel {
                    exam_id: Set(exam_id),
                    student_id: Set(req.student_id),
                    score: Set(req.score),
                    notes: Set(req.notes),
                    recorded_by: Set(recorded_by),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
            }
        }
        .map_err(|e| LmsError::database_operation(format!("保存考试成绩失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved.into_exam_score())
    }

    /// 列出考试的全部成绩
    pub async fn list_exam_scores_impl(&self, exam_id: i64) -> Result<Vec<ExamScore>> {
        let result = ExamScores::find()
            .filter(ExamScoreColumn::ExamId.eq(exam_id))
            .order_by_asc(ExamScoreColumn::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询考试成绩失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_exam_score()).collect())
    }

    /// 删除考试及其全部成绩
    pub async fn delete_exam_impl(&self, exam_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        ExamScores::delete_many()
            .filter(ExamScoreColumn::ExamId.eq(exam_id))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除考试成绩失败: {e}")))?;

        let result = Exams::delete_by_id(exam_id)
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除考试失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
