//! 从存储层到成绩计算的完整流程，使用内存 SQLite

use std::sync::Arc;

use rust_hanlms::errors::LmsError;
use rust_hanlms::grading::{GradeTier, GradeWeights, compute_class_rollup};
use rust_hanlms::models::{
    assignments::requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
    class_users::entities::ClassUserRole,
    classes::{entities::Class, requests::CreateClassRequest},
    exams::requests::{CreateExamRequest, RecordExamScoreRequest},
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use rust_hanlms::storage::{Storage, sea_orm_storage::SeaOrmStorage};
use sea_orm::{ConnectOptions, Database};

async fn setup() -> Arc<dyn Storage> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Arc::new(SeaOrmStorage::from_connection(db).await.unwrap())
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

async fn create_class(storage: &Arc<dyn Storage>, teacher: &User) -> Class {
    storage
        .create_class(CreateClassRequest {
            teacher_id: Some(teacher.id),
            name: "초급 1반".to_string(),
            description: None,
        })
        .await
        .unwrap()
}

fn score(student_id: i64, score: f64) -> RecordExamScoreRequest {
    RecordExamScoreRequest {
        student_id,
        score,
        notes: None,
    }
}

#[tokio::test]
async fn test_class_grades_end_to_end() {
    let storage = setup().await;
    let teacher = create_user(&storage, "teacher01", UserRole::Teacher).await;
    let minsu = create_user(&storage, "minsu01", UserRole::User).await;
    let jiwoo = create_user(&storage, "jiwoo01", UserRole::User).await;

    let class = create_class(&storage, &teacher).await;
    let teacher_member = storage
        .get_class_user(class.id, teacher.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(teacher_member.role, ClassUserRole::Teacher);

    for student in [&minsu, &jiwoo] {
        storage
            .join_class(student.id, class.id, ClassUserRole::Student, None)
            .await
            .unwrap();
    }
    assert_eq!(storage.list_class_members(class.id).await.unwrap().len(), 3);

    let midterm = storage
        .create_exam(
            class.id,
            teacher.id,
            CreateExamRequest {
                title: "중간고사".to_string(),
                max_score: 100.0,
                exam_date: None,
            },
        )
        .await
        .unwrap();
    let quiz = storage
        .create_exam(
            class.id,
            teacher.id,
            CreateExamRequest {
                title: "단어 퀴즈".to_string(),
                max_score: 50.0,
                exam_date: None,
            },
        )
        .await
        .unwrap();

    // 重复录入覆盖原成绩
    storage
        .upsert_exam_score(midterm.id, teacher.id, score(minsu.id, 80.0))
        .await
        .unwrap();
    storage
        .upsert_exam_score(midterm.id, teacher.id, score(minsu.id, 90.0))
        .await
        .unwrap();
    storage
        .upsert_exam_score(quiz.id, teacher.id, score(minsu.id, 45.0))
        .await
        .unwrap();
    storage
        .upsert_exam_score(midterm.id, teacher.id, score(jiwoo.id, 30.0))
        .await
        .unwrap();

    let midterm_scores = storage.list_exam_scores(midterm.id).await.unwrap();
    assert_eq!(midterm_scores.len(), 2);
    let minsu_midterm = midterm_scores
        .iter()
        .find(|s| s.student_id == minsu.id)
        .unwrap();
    assert_eq!(minsu_midterm.score, 90.0);

    let essay = storage
        .create_assignment(
            class.id,
            teacher.id,
            CreateAssignmentRequest {
                title: "자기소개 작문".to_string(),
                description: None,
                max_score: Some(10.0),
                due_date: None,
            },
        )
        .await
        .unwrap();

    let minsu_submission = storage
        .upsert_submission(essay.id, minsu.id, "저는 민수입니다.".to_string(), false)
        .await
        .unwrap();
    let jiwoo_submission = storage
        .upsert_submission(essay.id, jiwoo.id, "저는 지우입니다.".to_string(), true)
        .await
        .unwrap();

    let (graded, stats) = storage
        .grade_submission(minsu_submission.id, teacher.id, 7.0, Some("좋아요".to_string()))
        .await
        .unwrap();
    assert_eq!(graded.score, Some(7.0));
    assert_eq!(graded.graded_by, Some(teacher.id));
    assert_eq!(stats.submitted_count, 2);
    assert_eq!(stats.graded_count, 1);
    assert_eq!(stats.late_count, 1);
    assert_eq!(stats.average_score, Some(7.0));

    let weights = GradeWeights::default();
    let gradebook = storage.load_class_gradebook(class.id).await.unwrap();
    let summaries = gradebook.summarize_many(&[minsu.id, jiwoo.id], &weights);

    assert_eq!(summaries[0].test_scores, vec![9.0, 9.0]);
    assert_eq!(summaries[0].assignment_average, Some(7.0));
    assert_eq!(summaries[0].final_grade, Some(8.2));
    assert_eq!(summaries[0].tier, GradeTier::Good);

    // 未批改的提交不计入成绩
    assert_eq!(summaries[1].assignment_average, None);
    assert_eq!(summaries[1].final_grade, Some(3.0));
    assert_eq!(summaries[1].tier, GradeTier::Poor);

    let rollup = compute_class_rollup(&summaries);
    assert_eq!(rollup.class_average, Some(5.6));
    assert_eq!(rollup.graded_students, 2);
    assert_eq!(rollup.count(GradeTier::Good), 1);
    assert_eq!(rollup.count(GradeTier::Poor), 1);

    // 删除考试后其成绩不再参与计算
    assert!(storage.delete_exam(quiz.id).await.unwrap());
    let gradebook = storage.load_class_gradebook(class.id).await.unwrap();
    let minsu_summary = gradebook.summarize(minsu.id, &weights);
    assert_eq!(minsu_summary.test_scores, vec![9.0]);
    assert_eq!(minsu_summary.skipped_entries, 0);

    // jiwoo 的提交未批改，可以删除；minsu 的已批改，不能删除
    assert!(!storage
        .delete_ungraded_submission(minsu_submission.id)
        .await
        .unwrap());
    assert!(storage
        .delete_ungraded_submission(jiwoo_submission.id)
        .await
        .unwrap());
    let stats = storage.get_assignment_stats(essay.id).await.unwrap();
    assert_eq!(stats.submitted_count, 1);
    assert_eq!(stats.late_count, 0);
}

#[tokio::test]
async fn test_grading_rules_are_enforced() {
    let storage = setup().await;
    let teacher = create_user(&storage, "teacher02", UserRole::Teacher).await;
    let student = create_user(&storage, "haeun02", UserRole::User).await;
    let class = create_class(&storage, &teacher).await;
    storage
        .join_class(student.id, class.id, ClassUserRole::Student, None)
        .await
        .unwrap();

    let assignment = storage
        .create_assignment(
            class.id,
            teacher.id,
            CreateAssignmentRequest {
                title: "받아쓰기".to_string(),
                description: None,
                max_score: None,
                due_date: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(assignment.max_score, 100.0);

    let submission = storage
        .upsert_submission(assignment.id, student.id, "첫 답안".to_string(), false)
        .await
        .unwrap();

    // 未批改时重新提交会覆盖内容
    let resubmitted = storage
        .upsert_submission(assignment.id, student.id, "고친 답안".to_string(), false)
        .await
        .unwrap();
    assert_eq!(resubmitted.id, submission.id);
    assert_eq!(resubmitted.content, "고친 답안");

    // 已有提交后截止时间不可修改
    let err = storage
        .update_assignment(
            assignment.id,
            UpdateAssignmentRequest {
                due_date: Some(chrono::Utc::now()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Conflict(_)));

    // 超出满分的批改被拒绝
    let err = storage
        .grade_submission(submission.id, teacher.id, 120.0, None)
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::InvalidScore(_)));

    storage
        .grade_submission(submission.id, teacher.id, 85.0, None)
        .await
        .unwrap();

    // 已批改后满分不可修改，标题可以
    let err = storage
        .update_assignment(
            assignment.id,
            UpdateAssignmentRequest {
                max_score: Some(50.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Conflict(_)));

    let renamed = storage
        .update_assignment(
            assignment.id,
            UpdateAssignmentRequest {
                title: Some("받아쓰기 1".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(renamed.title, "받아쓰기 1");

    // 已批改后不能再重新提交
    let err = storage
        .upsert_submission(assignment.id, student.id, "또 고친 답안".to_string(), false)
        .await
        .unwrap_err();
    assert!(matches!(err, LmsError::Conflict(_)));

    // 重复批改以最后一次为准
    let (regraded, stats) = storage
        .grade_submission(submission.id, teacher.id, 90.0, None)
        .await
        .unwrap();
    assert_eq!(regraded.score, Some(90.0));
    assert_eq!(stats.average_score, Some(9.0));
}

#[tokio::test]
async fn test_empty_class_has_no_grades() {
    let storage = setup().await;
    let teacher = create_user(&storage, "teacher03", UserRole::Teacher).await;
    let student = create_user(&storage, "seojun03", UserRole::User).await;
    let class = create_class(&storage, &teacher).await;
    storage
        .join_class(student.id, class.id, ClassUserRole::Student, None)
        .await
        .unwrap();

    let gradebook = storage.load_class_gradebook(class.id).await.unwrap();
    let summary = gradebook.summarize(student.id, &GradeWeights::default());
    assert_eq!(summary.test_average, None);
    assert_eq!(summary.assignment_average, None);
    assert_eq!(summary.final_grade, None);
    assert_eq!(summary.tier, GradeTier::NotClassified);

    let rollup = compute_class_rollup([&summary]);
    assert_eq!(rollup.class_average, None);
    assert_eq!(rollup.graded_students, 0);
    assert_eq!(rollup.count(GradeTier::NotClassified), 1);
}
