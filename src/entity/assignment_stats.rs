//! 作业统计实体（每个作业一行）

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignment_stats")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub assignment_id: i64,
    pub submitted_count: i64,
    pub graded_count: i64,
    pub late_count: i64,
    pub average_score: Option<f64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_stats(self) -> crate::models::assignments::entities::AssignmentStats {
        use crate::models::assignments::entities::AssignmentStats;

        AssignmentStats {
            assignment_id: self.assignment_id,
            submitted_count: self.submitted_count,
            graded_count: self.graded_count,
            late_count: self.late_count,
            average_score: self.average_score,
            updated_at: to_datetime(self.updated_at),
        }
    }
}
