use std::sync::Arc;

use crate::grading::Gradebook;
use crate::models::{
    assignments::{
        entities::{Assignment, AssignmentStats},
        requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    },
    class_users::entities::{ClassUser, ClassUserRole},
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest},
        responses::ClassListResponse,
    },
    exams::{
        entities::{Exam, ExamScore},
        requests::{CreateExamRequest, RecordExamScoreRequest},
    },
    submissions::entities::Submission,
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（密码需已哈希）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 批量获取用户
    async fn get_users_by_ids(&self, ids: &[i64]) -> Result<Vec<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 班级管理方法
    // 创建班级，同时把教师加入班级
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 列出班级
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;
    // 列出用户所在的班级
    async fn list_user_classes(&self, user_id: i64) -> Result<Vec<Class>>;

    /// 班级成员方法
    // 加入班级
    async fn join_class(
        &self,
        user_id: i64,
        class_id: i64,
        role: ClassUserRole,
        profile_name: Option<String>,
    ) -> Result<ClassUser>;
    // 获取用户在班级中的信息
    async fn get_class_user(&self, class_id: i64, user_id: i64) -> Result<Option<ClassUser>>;
    // 列出班级成员
    async fn list_class_members(&self, class_id: i64) -> Result<Vec<ClassUser>>;

    /// 考试方法
    async fn create_exam(
        &self,
        class_id: i64,
        created_by: i64,
        req: CreateExamRequest,
    ) -> Result<Exam>;
    async fn get_exam_by_id(&self, exam_id: i64) -> Result<Option<Exam>>;
    async fn list_class_exams(&self, class_id: i64) -> Result<Vec<Exam>>;
    // 录入成绩，同一 (考试, 学生) 覆盖写入
    async fn upsert_exam_score(
        &self,
        exam_id: i64,
        recorded_by: i64,
        req: RecordExamScoreRequest,
    ) -> Result<ExamScore>;
    async fn list_exam_scores(&self, exam_id: i64) -> Result<Vec<ExamScore>>;
    // 删除考试及其成绩
    async fn delete_exam(&self, exam_id: i64) -> Result<bool>;

    /// 作业方法
    async fn create_assignment(
        &self,
        class_id: i64,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn list_class_assignments(&self, class_id: i64) -> Result<Vec<Assignment>>;
    // 更新作业；已有提交时不可改截止时间，已有批改时不可改满分
    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;
    async fn get_assignment_stats(&self, assignment_id: i64) -> Result<AssignmentStats>;

    /// 提交方法
    // 提交或重新提交（未批改时），并刷新作业统计
    async fn upsert_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        content: String,
        is_late: bool,
    ) -> Result<Submission>;
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    async fn get_student_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_assignment_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>>;
    // 批改提交，与作业统计在同一事务中写入
    async fn grade_submission(
        &self,
        submission_id: i64,
        grader_id: i64,
        score: f64,
        feedback: Option<String>,
    ) -> Result<(Submission, AssignmentStats)>;
    // 删除未批改的提交；已批改返回 false
    async fn delete_ungraded_submission(&self, submission_id: i64) -> Result<bool>;

    /// 成绩方法
    // 读取班级成绩册（考试、考试成绩、作业、已批改提交）
    async fn load_class_gradebook(&self, class_id: i64) -> Result<Gradebook>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
