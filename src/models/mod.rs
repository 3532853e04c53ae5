//! 数据模型定义
//!
//! 业务实体、请求与响应结构，统一导出 TypeScript 类型供前端使用。

pub mod assignments;
pub mod auth;
pub mod class_users;
pub mod classes;
pub mod common;
pub mod exams;
pub mod grades;
pub mod submissions;
pub mod users;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码
///
/// 按模块分段：1xxx 通用，2xxx 用户与认证，3xxx 班级，4xxx 考试，5xxx 作业，6xxx 提交与评分。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,

    AuthFailed = 2000,
    UserNotFound = 2001,
    UserAlreadyExists = 2002,
    UserNameInvalid = 2003,
    UserEmailInvalid = 2004,
    UserPasswordInvalid = 2005,
    UserCreationFailed = 2006,

    ClassNotFound = 3000,
    ClassCreationFailed = 3001,
    ClassPermissionDenied = 3002,
    ClassInviteCodeInvalid = 3003,
    ClassAlreadyJoined = 3004,
    ClassJoinFailed = 3005,

    ExamNotFound = 4000,
    ExamScoreInvalid = 4001,
    ExamStudentNotInClass = 4002,

    AssignmentNotFound = 5000,
    AssignmentDueDateLocked = 5001,
    AssignmentMaxScoreLocked = 5002,
    AssignmentInvalid = 5003,

    SubmissionNotFound = 6000,
    SubmissionAlreadyGraded = 6001,
    SubmissionScoreInvalid = 6002,
    GradeNotAvailable = 6003,
}
