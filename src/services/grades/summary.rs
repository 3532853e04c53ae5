//! 成绩册 → 接口响应

use std::collections::HashMap;
use std::sync::Arc;

use actix_web::HttpResponse;

use crate::grading::{ClassRollup, GradeTier, GradeWeights, Gradebook, compute_class_rollup};
use crate::models::{
    class_users::entities::ClassUser,
    grades::responses::{ClassGradeStatsResponse, GradeWeightsInfo, StudentGradeSummary, TierCount},
    users::entities::User,
};
use crate::services::storage_error_response;
use crate::storage::Storage;

/// 班级内学生的显示名：班级内昵称 > 用户显示名 > 用户名
fn display_name(member: &ClassUser, user: Option<&User>) -> String {
    member
        .profile_name
        .clone()
        .or_else(|| user.map(|u| u.display_name_or_username().to_string()))
        .unwrap_or_else(|| format!("#{}", member.user_id))
}

/// 为班级中所有学生（含课代表）计算成绩汇总，按加入顺序排列
pub fn build_student_summaries(
    members: &[ClassUser],
    users: &[User],
    gradebook: &Gradebook,
    weights: &GradeWeights,
) -> Vec<StudentGradeSummary> {
    let learners: Vec<&ClassUser> = members.iter().filter(|m| m.role.is_learner()).collect();
    let student_ids: Vec<i64> = learners.iter().map(|m| m.user_id).collect();
    let users_by_id: HashMap<i64, &User> = users.iter().map(|u| (u.id, u)).collect();

    learners
        .into_iter()
        .zip(gradebook.summarize_many(&student_ids, weights))
        .map(|(member, grades)| StudentGradeSummary {
            student_id: member.user_id,
            display_name: display_name(member, users_by_id.get(&member.user_id).copied()),
            grades,
        })
        .collect()
}

/// 班级统计，等级按从高到低排列
pub fn build_class_stats(
    class_id: i64,
    weights: &GradeWeights,
    summaries: &[StudentGradeSummary],
) -> ClassGradeStatsResponse {
    let rollup: ClassRollup = compute_class_rollup(summaries.iter().map(|s| &s.grades));

    ClassGradeStatsResponse {
        class_id,
        weights: GradeWeightsInfo {
            test_weight: weights.test,
            assignment_weight: weights.assignment,
        },
        class_average: rollup.class_average,
        graded_students: rollup.graded_students,
        total_students: rollup.total_students,
        tier_counts: GradeTier::ALL
            .iter()
            .map(|tier| TierCount {
                tier: *tier,
                label: tier.label().to_string(),
                count: rollup.count(*tier),
            })
            .collect(),
    }
}

/// 读取班级成员、用户和成绩册，计算全部学生的成绩汇总
pub(crate) async fn load_class_summaries(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    weights: &GradeWeights,
) -> Result<Vec<StudentGradeSummary>, HttpResponse> {
    let members = storage
        .list_class_members(class_id)
        .await
        .map_err(|e| storage_error_response("Failed to list class members", &e))?;

    let student_ids: Vec<i64> = members
        .iter()
        .filter(|m| m.role.is_learner())
        .map(|m| m.user_id)
        .collect();

    let users = storage
        .get_users_by_ids(&student_ids)
        .await
        .map_err(|e| storage_error_response("Failed to load students", &e))?;

    let gradebook = storage
        .load_class_gradebook(class_id)
        .await
        .map_err(|e| storage_error_response("Failed to load gradebook", &e))?;

    Ok(build_student_summaries(&members, &users, &gradebook, weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::{GradeItem, ScoreRecord};
    use crate::models::{
        class_users::entities::ClassUserRole,
        users::entities::{UserRole, UserStatus},
    };

    fn member(user_id: i64, role: ClassUserRole, profile_name: Option<&str>) -> ClassUser {
        let now = chrono::Utc::now();
        ClassUser {
            id: user_id,
            class_id: 1,
            user_id,
            profile_name: profile_name.map(str::to_string),
            role,
            updated_at: now,
            joined_at: now,
        }
    }

    fn user(id: i64, username: &str, display_name: Option<&str>) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: String::new(),
            role: UserRole::User,
            status: UserStatus::Active,
            display_name: display_name.map(str::to_string),
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn gradebook() -> Gradebook {
        Gradebook {
            exams: vec![GradeItem {
                id: 1,
                max_score: 100.0,
            }],
            exam_scores: vec![
                ScoreRecord {
                    item_id: 1,
                    student_id: 2,
                    score: 90.0,
                },
                ScoreRecord {
                    item_id: 1,
                    student_id: 3,
                    score: 50.0,
                },
            ],
            assignments: vec![GradeItem {
                id: 9,
                max_score: 10.0,
            }],
            assignment_scores: vec![ScoreRecord {
                item_id: 9,
                student_id: 2,
                score: 7.0,
            }],
        }
    }

    #[test]
    fn test_summaries_cover_learners_only() {
        let members = vec![
            member(1, ClassUserRole::Teacher, None),
            member(2, ClassUserRole::Student, Some("민수")),
            member(3, ClassUserRole::ClassRepresentative, None),
            member(4, ClassUserRole::Student, None),
        ];
        let users = vec![
            user(2, "minsu", None),
            user(3, "jiwoo", Some("Jiwoo Park")),
            user(4, "haeun", None),
        ];

        let summaries =
            build_student_summaries(&members, &users, &gradebook(), &GradeWeights::default());

        let names: Vec<&str> = summaries.iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(names, vec!["민수", "Jiwoo Park", "haeun"]);

        // 9.0 * 0.6 + 7.0 * 0.4
        assert_eq!(summaries[0].grades.final_grade, Some(8.2));
        assert_eq!(summaries[0].grades.tier, GradeTier::Good);
        assert_eq!(summaries[1].grades.final_grade, Some(5.0));
        assert_eq!(summaries[2].grades.final_grade, None);
        assert_eq!(summaries[2].grades.tier, GradeTier::NotClassified);
    }

    #[test]
    fn test_missing_user_falls_back_to_id() {
        let members = vec![member(5, ClassUserRole::Student, None)];
        let summaries =
            build_student_summaries(&members, &[], &Gradebook::default(), &GradeWeights::default());
        assert_eq!(summaries[0].display_name, "#5");
    }

    #[test]
    fn test_class_stats_lists_every_tier() {
        let members = vec![
            member(2, ClassUserRole::Student, None),
            member(3, ClassUserRole::Student, None),
            member(4, ClassUserRole::Student, None),
        ];
        let weights = GradeWeights::default();
        let summaries = build_student_summaries(&members, &[], &gradebook(), &weights);
        let stats = build_class_stats(1, &weights, &summaries);

        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.graded_students, 2);
        // (8.2 + 5.0) / 2
        assert_eq!(stats.class_average, Some(6.6));
        assert_eq!(stats.weights.test_weight, 0.6);

        let tiers: Vec<GradeTier> = stats.tier_counts.iter().map(|t| t.tier).collect();
        assert_eq!(tiers, GradeTier::ALL.to_vec());
        let count = |tier: GradeTier| {
            stats
                .tier_counts
                .iter()
                .find(|t| t.tier == tier)
                .map(|t| t.count)
                .unwrap_or(0)
        };
        assert_eq!(count(GradeTier::Good), 1);
        assert_eq!(count(GradeTier::BelowAverage), 1);
        assert_eq!(count(GradeTier::NotClassified), 1);
        assert_eq!(count(GradeTier::Excellent), 0);
    }

    #[test]
    fn test_empty_class_stats() {
        let stats = build_class_stats(1, &GradeWeights::default(), &[]);
        assert_eq!(stats.class_average, None);
        assert_eq!(stats.total_students, 0);
        assert_eq!(stats.tier_counts.len(), GradeTier::ALL.len());
    }
}
