//! 班级存储操作

use super::SeaOrmStorage;
use crate::entity::class_users::{
    ActiveModel as ClassUserActiveModel, Column as ClassUserColumn, Entity as ClassUsers,
};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    class_users::entities::ClassUserRole,
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest},
        responses::ClassListResponse,
    },
};
use crate::utils::{escape_like_pattern, random_code::generate_random_code};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建班级，教师成员记录在同一事务中写入
    pub async fn create_class_impl(&self, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();
        let invite_code = generate_random_code(8); // 自动生成邀请码

        // teacher_id 必须由服务层确保已设置
        let teacher_id = req.teacher_id.ok_or_else(|| {
            LmsError::database_operation("teacher_id must be set before calling create_class")
        })?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let class = ActiveModel {
            teacher_id: Set(teacher_id),
            name: Set(req.name),
            description: Set(req.description),
            invite_code: Set(invite_code),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| LmsError::database_operation(format!("创建班级失败: {e}")))?;

        ClassUserActiveModel {
            class_id: Set(class.id),
            user_id: Set(teacher_id),
            role: Set(ClassUserRole::Teacher.to_string()),
            profile_name: Set(None),
            updated_at: Set(now),
            joined_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| LmsError::database_operation(format!("添加班级教师失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(class.into_class())
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let mut select = Classes::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::Name.contains(&escaped));
        }

        select = select.order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, query.size as u64);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级总数失败: {e}")))?;

        let classes = paginator
            .fetch_page((query.page - 1) as u64)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo::new(query.page, query.size, total as i64),
        })
    }

    /// 列出用户所在的班级
    pub async fn list_user_classes_impl(&self, user_id: i64) -> Result<Vec<Class>> {
        let class_ids: Vec<i64> = ClassUsers::find()
            .filter(ClassUserColumn::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户班级失败: {e}")))?
            .into_iter()
            .map(|m| m.class_id)
            .collect();

        if class_ids.is_empty() {
            return Ok(Vec::new());
        }

        let classes = Classes::find()
            .filter(Column::Id.is_in(class_ids))
            .order_by_desc(Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(classes.into_iter().map(|m| m.into_class()).collect())
    }
}
