//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 所有时间字段以 Unix 秒存储。

pub mod prelude;

pub mod assignment_stats;
pub mod assignments;
pub mod class_users;
pub mod classes;
pub mod exam_scores;
pub mod exams;
pub mod submissions;
pub mod users;

use chrono::{DateTime, Utc};

pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
