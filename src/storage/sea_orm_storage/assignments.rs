//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignment_stats::{
    ActiveModel as StatsActiveModel, Column as StatsColumn, Entity as AssignmentStatsEntity,
};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{LmsError, Result};
use crate::models::assignments::{
    entities::{Assignment, AssignmentStats},
    requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};

/// 未指定满分时的默认满分
pub const DEFAULT_MAX_SCORE: f64 = 100.0;

impl SeaOrmStorage {
    /// 创建作业，同时写入空的统计行
    pub async fn create_assignment_impl(
        &self,
        class_id: i64,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let assignment = ActiveModel {
            class_id: Set(class_id),
            title: Set(req.title),
            description: Set(req.description),
            max_score: Set(req.max_score.unwrap_or(DEFAULT_MAX_SCORE)),
            due_date: Set(req.due_date.map(|d| d.timestamp())),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| LmsError::database_operation(format!("创建作业失败: {e}")))?;

        StatsActiveModel {
            assignment_id: Set(assignment.id),
            submitted_count: Set(0),
            graded_count: Set(0),
            late_count: Set(0),
            average_score: Set(None),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| LmsError::database_operation(format!("创建作业统计失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(assignment.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 列出班级的作业，按创建顺序
    pub async fn list_class_assignments_impl(&self, class_id: i64) -> Result<Vec<Assignment>> {
        let result = Assignments::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_assignment()).collect())
    }

    /// 更新作业
    ///
    /// 截止时间在已有提交后锁定，满分在已有批改后锁定，违反时返回 `Conflict`。
    pub async fn update_assignment_impl(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let Some(existing) = Assignments::find_by_id(assignment_id)
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?
        else {
            return Ok(None);
        };

        let new_due_date = update.due_date.map(|d| d.timestamp());
        if new_due_date.is_some() && new_due_date != existing.due_date {
            let submitted = Submissions::find()
                .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
                .count(&txn)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询提交数量失败: {e}")))?;
            if submitted > 0 {
                return Err(LmsError::conflict(
                    "due date cannot be changed after submissions exist",
                ));
            }
        }

        if let Some(max_score) = update.max_score
            && max_score != existing.max_score
        {
            let graded = Submissions::find()
                .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
                .filter(SubmissionColumn::Score.is_not_null())
                .count(&txn)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询批改数量失败: {e}")))?;
            if graded > 0 {
                return Err(LmsError::conflict(
                    "max score cannot be changed after submissions are graded",
                ));
            }
        }

        let mut model = existing.into_active_model();
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(max_score) = update.max_score {
            model.max_score = Set(max_score);
        }
        if new_due_date.is_some() {
            model.due_date = Set(new_due_date);
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新作业失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(Some(updated.into_assignment()))
    }

    /// 删除作业及其提交与统计
    pub async fn delete_assignment_impl(&self, assignment_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        Submissions::delete_many()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除作业提交失败: {e}")))?;

        AssignmentStatsEntity::delete_many()
            .filter(StatsColumn::AssignmentId.eq(assignment_id))
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除作业统计失败: {e}")))?;

        let result = Assignments::delete_by_id(assignment_id)
            .exec(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("删除作业失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 读取作业统计，统计行缺失时视为空统计
    pub async fn get_assignment_stats_impl(&self, assignment_id: i64) -> Result<AssignmentStats> {
        let result = AssignmentStatsEntity::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业统计失败: {e}")))?;

        Ok(result
            .map(|m| m.into_stats())
            .unwrap_or_else(|| AssignmentStats::empty(assignment_id)))
    }
}
