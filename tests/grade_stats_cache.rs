//! 班级成绩统计缓存：命中缓存，以及各类写操作后失效

use std::sync::Arc;

use actix_web::{HttpMessage, HttpRequest, HttpResponse, http::StatusCode, test, web};
use serde_json::Value;

use rust_hanlms::cache::{ObjectCache, object_cache::MokaCacheWrapper};
use rust_hanlms::models::{
    assignments::requests::CreateAssignmentRequest,
    class_users::{entities::ClassUserRole, requests::JoinClassRequest},
    classes::{entities::Class, requests::CreateClassRequest},
    exams::requests::{CreateExamRequest, RecordExamScoreRequest},
    submissions::requests::GradeSubmissionRequest,
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use rust_hanlms::services::{
    AssignmentService, ClassService, ExamService, GradeService, SubmissionService,
};
use rust_hanlms::storage::{Storage, sea_orm_storage::SeaOrmStorage};
use sea_orm::{ConnectOptions, Database};

struct Fixture {
    storage: Arc<dyn Storage>,
    cache: Arc<dyn ObjectCache>,
    teacher: User,
    class: Class,
}

impl Fixture {
    async fn new() -> Self {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options
            .max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::from_connection(db).await.unwrap());
        let cache: Arc<dyn ObjectCache> = Arc::new(MokaCacheWrapper::with_settings(100, 300));

        let teacher = create_user(&storage, "teacher01", UserRole::Teacher).await;
        let class = storage
            .create_class(CreateClassRequest {
                teacher_id: Some(teacher.id),
                name: "중급 2반".to_string(),
                description: None,
            })
            .await
            .unwrap();

        Self {
            storage,
            cache,
            teacher,
            class,
        }
    }

    /// 以指定用户身份构造请求，相当于经过了 RequireJWT
    fn request_as(&self, user: &User) -> HttpRequest {
        let req = test::TestRequest::default()
            .app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::new(self.cache.clone()))
            .to_http_request();
        req.extensions_mut().insert(user.clone());
        req
    }

    async fn join(&self, student: &User) {
        let response = ClassService::new_lazy()
            .join_class(
                &self.request_as(student),
                self.class.id,
                JoinClassRequest {
                    invite_code: self.class.invite_code.clone(),
                    profile_name: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    async fn stats(&self) -> Value {
        let response = GradeService::new_lazy()
            .get_class_stats(&self.request_as(&self.teacher), self.class.id)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        body_data(response).await
    }
}

async fn create_user(storage: &Arc<dyn Storage>, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@hanlms.test"),
            password: "not-a-real-hash".to_string(),
            role,
            display_name: None,
        })
        .await
        .unwrap()
}

async fn body_data(response: HttpResponse) -> Value {
    let bytes = actix_web::body::to_bytes(response.into_body())
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    body["data"].clone()
}

fn tier_count(stats: &Value, tier: &str) -> u64 {
    stats["tier_counts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["tier"] == tier)
        .and_then(|entry| entry["count"].as_u64())
        .unwrap()
}

#[actix_web::test]
async fn test_join_refreshes_cached_stats() {
    let fixture = Fixture::new().await;
    let minsu = create_user(&fixture.storage, "minsu01", UserRole::User).await;
    let jiwoo = create_user(&fixture.storage, "jiwoo01", UserRole::User).await;
    let hana = create_user(&fixture.storage, "hana0001", UserRole::User).await;

    fixture.join(&minsu).await;
    let stats = fixture.stats().await;
    assert_eq!(stats["total_students"], 1);
    assert_eq!(tier_count(&stats, "not_classified"), 1);

    // 绕过服务层直接写库，统计仍来自缓存
    fixture
        .storage
        .join_class(jiwoo.id, fixture.class.id, ClassUserRole::Student, None)
        .await
        .unwrap();
    assert_eq!(fixture.stats().await["total_students"], 1);

    fixture.join(&hana).await;
    let stats = fixture.stats().await;
    assert_eq!(stats["total_students"], 3);
    assert_eq!(tier_count(&stats, "not_classified"), 3);
    assert!(stats["class_average"].is_null());
}

#[actix_web::test]
async fn test_exam_writes_refresh_cached_stats() {
    let fixture = Fixture::new().await;
    let minsu = create_user(&fixture.storage, "minsu01", UserRole::User).await;
    fixture.join(&minsu).await;

    let midterm = fixture
        .storage
        .create_exam(
            fixture.class.id,
            fixture.teacher.id,
            CreateExamRequest {
                title: "중간고사".to_string(),
                max_score: 100.0,
                exam_date: None,
            },
        )
        .await
        .unwrap();
    assert!(fixture.stats().await["class_average"].is_null());

    let exams = ExamService::new_lazy();
    let response = exams
        .record_score(
            &fixture.request_as(&fixture.teacher),
            midterm.id,
            RecordExamScoreRequest {
                student_id: minsu.id,
                score: 90.0,
                notes: None,
            },
        )
        .await
        .unwrap();
    assert!(response.status().is_success());

    let stats = fixture.stats().await;
    assert_eq!(stats["class_average"], 9.0);
    assert_eq!(tier_count(&stats, "excellent"), 1);

    let response = exams
        .delete_exam(&fixture.request_as(&fixture.teacher), midterm.id)
        .await
        .unwrap();
    assert!(response.status().is_success());

    let stats = fixture.stats().await;
    assert!(stats["class_average"].is_null());
    assert_eq!(tier_count(&stats, "not_classified"), 1);
}

#[actix_web::test]
async fn test_submission_grading_refreshes_cached_stats() {
    let fixture = Fixture::new().await;
    let minsu = create_user(&fixture.storage, "minsu01", UserRole::User).await;
    fixture.join(&minsu).await;

    let essay = fixture
        .storage
        .create_assignment(
            fixture.class.id,
            fixture.teacher.id,
            CreateAssignmentRequest {
                title: "자기소개 작문".to_string(),
                description: None,
                max_score: Some(10.0),
                due_date: None,
            },
        )
        .await
        .unwrap();
    let submission = fixture
        .storage
        .upsert_submission(essay.id, minsu.id, "저는 민수입니다.".to_string(), false)
        .await
        .unwrap();
    assert!(fixture.stats().await["class_average"].is_null());

    let response = SubmissionService::new_lazy()
        .grade_submission(
            &fixture.request_as(&fixture.teacher),
            submission.id,
            GradeSubmissionRequest {
                score: 6.0,
                feedback: None,
            },
        )
        .await
        .unwrap();
    assert!(response.status().is_success());

    let stats = fixture.stats().await;
    assert_eq!(stats["class_average"], 6.0);
    assert_eq!(tier_count(&stats, "average"), 1);

    let response = AssignmentService::new_lazy()
        .delete_assignment(&fixture.request_as(&fixture.teacher), essay.id)
        .await
        .unwrap();
    assert!(response.status().is_success());

    let stats = fixture.stats().await;
    assert!(stats["class_average"].is_null());
    assert_eq!(tier_count(&stats, "not_classified"), 1);
}
