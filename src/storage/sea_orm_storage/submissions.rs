//! 提交与批改存储操作
//!
//! 每次提交写入（新建、重新提交、批改、删除）都在同一事务中重新计算作业统计。

use super::SeaOrmStorage;
use crate::entity::assignment_stats::{
    ActiveModel as StatsActiveModel, Entity as AssignmentStatsEntity,
};
use crate::entity::assignments::Entity as Assignments;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions, Model};
use crate::errors::{LmsError, Result};
use crate::grading::{ScoreEntry, average_scores, normalize::validate_score};
use crate::models::{
    assignments::entities::AssignmentStats, submissions::entities::Submission,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, IntoActiveModel,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::warn;

impl SeaOrmStorage {
    /// 提交作业；未批改时重新提交会覆盖内容，已批改则返回 `Conflict`
    pub async fn upsert_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: String,
        is_late: bool,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let assignment = Assignments::find_by_id(assignment_id)
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?
            .ok_or_else(|| LmsError::not_found(format!("assignment {assignment_id}")))?;

        let existing = Submissions::find()
            .filter(
                Condition::all()
                    .add(Column::AssignmentId.eq(assignment_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        let saved = match existing {
            Some(model) if model.score.is_some() => {
                return Err(LmsError::conflict(
                    "submission has already been graded and cannot be replaced",
                ));
            }
            Some(model) => {
                let mut active = model.into_active_model();
                active.content = Set(content);
                active.is_late = Set(is_late);
                active.submitted_at = Set(now);
                active.update(&txn).await
            }
            None => {
                ActiveModel {
                    assignment_id: Set(assignment_id),
                    student_id: Set(student_id),
                    content: Set(content),
                    is_late: Set(is_late),
                    submitted_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
            }
        }
        .map_err(|e| LmsError::database_operation(format!("保存提交失败: {e}")))?;

        refresh_assignment_stats(&txn, assignment_id, assignment.max_score).await?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(saved.into_submission())
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(&self, submission_id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取学生在某作业下的提交
    pub async fn get_student_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(
                Condition::all()
                    .add(Column::AssignmentId.eq(assignment_id))
                    .add(Column::StudentId.eq(student_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出作业的全部提交
    pub async fn list_assignment_submissions_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::SubmittedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_submission()).collect())
    }

    /// 批改提交并刷新作业统计，重复批改以最后一次为准
    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        grader_id: i64,
        score: f64,
        feedback: Option<String>,
    ) -> Result<(Submission, AssignmentStats)> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let submission = Submissions::find_by_id(submission_id)
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?
            .ok_or_else(|| LmsError::not_found(format!("submission {submission_id}")))?;

        let assignment = Assignments::find_by_id(submission.assignment_id)
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?
            .ok_or_else(|| {
                LmsError::not_found(format!("assignment {}", submission.assignment_id))
            })?;

        validate_score(score, assignment.max_score)?;

        let mut active = submission.into_active_model();
        active.score = Set(Some(score));
        active.feedback = Set(feedback);
        active.graded_at = Set(Some(now));
        active.graded_by = Set(Some(grader_id));
        let graded = active
            .update(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("保存批改结果失败: {e}")))?;

        let stats = refresh_assignment_stats(&txn, assignment.id, assignment.max_score).await?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((graded.into_submission(), stats))
    }

    /// 删除未批改的提交；提交不存在或已批改时返回 false
    pub async fn delete_ungraded_submission_impl(&self, submission_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(submission) = Submissions::find_by_id(submission_id)
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?
        else {
            return Ok(false);
        };

        // 以 score IS NULL 为条件删除，与并发批改互斥
        let result = Submissions::delete_many()
            .filter(Column::Id.eq(submission_id))
            .filter(Column::Score.is_null())
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除提交失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(false);
        }

        if let Some(assignment) = Assignments::find_by_id(submission.assignment_id)
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?
        {
            refresh_assignment_stats(&txn, assignment.id, assignment.max_score).await?;
        }

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(true)
    }
}

/// 由作业的全部提交重新计算统计并写回
async fn refresh_assignment_stats<C: ConnectionTrait>(
    conn: &C,
    assignment_id: i64,
    max_score: f64,
) -> Result<AssignmentStats> {
    let submissions = Submissions::find()
        .filter(Column::AssignmentId.eq(assignment_id))
        .all(conn)
        .await
        .map_err(|e| LmsError::database_operation(format!("查询提交列表失败: {e}")))?;

    let now = chrono::Utc::now().timestamp();
    let stats = build_assignment_stats(assignment_id, max_score, &submissions);

    let model = StatsActiveModel {
        assignment_id: Set(assignment_id),
        submitted_count: Set(stats.submitted_count),
        graded_count: Set(stats.graded_count),
        late_count: Set(stats.late_count),
        average_score: Set(stats.average_score),
        updated_at: Set(now),
    };

    let exists = AssignmentStatsEntity::find_by_id(assignment_id)
        .one(conn)
        .await
        .map_err(|e| LmsError::database_operation(format!("查询作业统计失败: {e}")))?
        .is_some();

    let saved = if exists {
        model.update(conn).await
    } else {
        model.insert(conn).await
    }
    .map_err(|e| LmsError::database_operation(format!("保存作业统计失败: {e}")))?;

    Ok(saved.into_stats())
}

/// 统计提交数量与已批改提交的平均分（10 分制）
fn build_assignment_stats(
    assignment_id: i64,
    max_score: f64,
    submissions: &[Model],
) -> AssignmentStats {
    let mut normalized = Vec::new();
    let mut graded_count = 0;

    for score in submissions.iter().filter_map(|s| s.score) {
        graded_count += 1;
        match ScoreEntry::new(score, max_score).normalized() {
            Ok(value) => normalized.push(value),
            Err(e) => warn!(
                "Skipping graded submission of assignment {} in stats: {}",
                assignment_id, e
            ),
        }
    }

    AssignmentStats {
        assignment_id,
        submitted_count: submissions.len() as i64,
        graded_count,
        late_count: submissions.iter().filter(|s| s.is_late).count() as i64,
        average_score: average_scores(&normalized),
        updated_at: chrono::Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(id: i64, score: Option<f64>, is_late: bool) -> Model {
        Model {
            id,
            assignment_id: 1,
            student_id: id + 100,
            content: "answer".to_string(),
            is_late,
            submitted_at: 0,
            score,
            feedback: None,
            graded_at: None,
            graded_by: None,
        }
    }

    #[test]
    fn test_stats_without_grades() {
        let stats = build_assignment_stats(1, 20.0, &[submission(1, None, false)]);
        assert_eq!(stats.submitted_count, 1);
        assert_eq!(stats.graded_count, 0);
        assert_eq!(stats.average_score, None);
    }

    #[test]
    fn test_stats_average_normalized() {
        let subs = [
            submission(1, Some(18.0), false),
            submission(2, Some(10.0), true),
            submission(3, None, true),
        ];
        let stats = build_assignment_stats(1, 20.0, &subs);
        assert_eq!(stats.submitted_count, 3);
        assert_eq!(stats.graded_count, 2);
        assert_eq!(stats.late_count, 2);
        // 9.0 与 5.0
        assert_eq!(stats.average_score, Some(7.0));
    }

    #[test]
    fn test_stats_skip_out_of_range_score() {
        let subs = [submission(1, Some(30.0), false), submission(2, Some(10.0), false)];
        let stats = build_assignment_stats(1, 20.0, &subs);
        assert_eq!(stats.graded_count, 2);
        assert_eq!(stats.average_score, Some(5.0));
    }
}
