//! 班级用户关联存储操作

use super::SeaOrmStorage;
use crate::entity::class_users::{ActiveModel, Column, Entity as ClassUsers};
use crate::errors::{LmsError, Result};
use crate::models::class_users::entities::{ClassUser, ClassUserRole};
use sea_orm::{ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 加入班级
    pub async fn join_class_impl(
        &self,
        user_id: i64,
        class_id: i64,
        role: ClassUserRole,
        profile_name: Option<String>,
    ) -> Result<ClassUser> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(class_id),
            user_id: Set(user_id),
            role: Set(role.to_string()),
            profile_name: Set(profile_name),
            updated_at: Set(now),
            joined_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("加入班级失败: {e}")))?;

        Ok(result.into_class_user())
    }

    /// 获取用户在班级中的成员记录
    pub async fn get_class_user_impl(
        &self,
        class_id: i64,
        user_id: i64,
    ) -> Result<Option<ClassUser>> {
        let result = ClassUsers::find()
            .filter(
                Condition::all()
                    .add(Column::ClassId.eq(class_id))
                    .add(Column::UserId.eq(user_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级用户失败: {e}")))?;

        Ok(result.map(|m| m.into_class_user()))
    }

    /// 列出班级全部成员
    pub async fn list_class_members_impl(&self, class_id: i64) -> Result<Vec<ClassUser>> {
        let result = ClassUsers::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::JoinedAt)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级成员失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_class_user()).collect())
    }
}
